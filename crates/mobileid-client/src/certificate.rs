use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use x509_parser::der_parser::asn1_rs::{oid, Any, Oid};
use x509_parser::prelude::*;

use crate::error::AuthError;
use crate::model::Person;

// Subject DN attribute OIDs.
const OID_COMMON_NAME: Oid<'static> = oid!(2.5.4.3);
const OID_SURNAME: Oid<'static> = oid!(2.5.4.4);
const OID_SERIAL_NUMBER: Oid<'static> = oid!(2.5.4.5);
const OID_GIVEN_NAME: Oid<'static> = oid!(2.5.4.42);

// ASN.1 string tags as they appear in DirectoryString values.
const TAG_UTF8_STRING: u32 = 12;
const TAG_PRINTABLE_STRING: u32 = 19;
const TAG_TELETEX_STRING: u32 = 20;
const TAG_IA5_STRING: u32 = 22;
const TAG_BMP_STRING: u32 = 30;

/// Extracts the verified person record from a base64-encoded DER certificate
/// returned by the provider on successful authentication.
///
/// The Subject serialNumber carries `"<country>-<nationalId>"`; the national
/// id after the last hyphen becomes the personal code. All four attributes
/// (serialNumber, commonName, givenName, surname) must be present, otherwise
/// the whole extraction fails.
pub fn extract(base64_cert: &str) -> Result<Person, AuthError> {
    let der = BASE64
        .decode(base64_cert)
        .map_err(|_| AuthError::FailedToDecodeCertificate)?;

    let (_, cert) =
        X509Certificate::from_der(&der).map_err(|_| AuthError::FailedToParseCertificate)?;

    let subject = cert.subject();
    let identity_number = subject_attribute(subject, &OID_SERIAL_NUMBER)?;
    let first_name = subject_attribute(subject, &OID_GIVEN_NAME)?;
    let last_name = subject_attribute(subject, &OID_SURNAME)?;
    // commonName repeats givenName and surname; its absence still fails the
    // whole extraction.
    subject_attribute(subject, &OID_COMMON_NAME)?;

    let personal_code = match identity_number.rsplit_once('-') {
        Some((_, code)) if !code.is_empty() => code.to_string(),
        _ => return Err(AuthError::InvalidIdentityNumber(identity_number)),
    };

    Ok(Person {
        identity_number,
        personal_code,
        first_name,
        last_name,
    })
}

fn subject_attribute(name: &X509Name<'_>, oid: &Oid<'_>) -> Result<String, AuthError> {
    name.iter_rdn()
        .flat_map(|rdn| rdn.iter())
        .find(|attr| attr.attr_type() == oid)
        .ok_or(AuthError::FailedToParseCertificate)
        .and_then(|attr| decode_directory_string(attr.attr_value()))
}

/// Decodes a DirectoryString per its declared charset, normalizing to
/// Unicode. Certificates issued before 2015 use TeletexString with the
/// legacy Baltic 8-bit encoding.
fn decode_directory_string(value: &Any<'_>) -> Result<String, AuthError> {
    let data = value.data;
    match value.tag().0 {
        TAG_UTF8_STRING => String::from_utf8(data.to_vec())
            .map_err(|_| AuthError::FailedToParseCertificate),
        TAG_PRINTABLE_STRING | TAG_IA5_STRING => {
            if data.is_ascii() {
                Ok(String::from_utf8_lossy(data).into_owned())
            } else {
                Err(AuthError::FailedToParseCertificate)
            }
        }
        TAG_BMP_STRING => {
            if data.len() % 2 != 0 {
                return Err(AuthError::FailedToParseCertificate);
            }
            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).map_err(|_| AuthError::FailedToParseCertificate)
        }
        TAG_TELETEX_STRING => Ok(data.iter().map(|&b| baltic_char(b)).collect()),
        _ => Err(AuthError::FailedToParseCertificate),
    }
}

/// Byte-to-Unicode mapping for the legacy Baltic (Windows-1257 style)
/// encoding; bytes below 0xA0 fall through as Latin-1.
fn baltic_char(byte: u8) -> char {
    const HIGH: [char; 96] = [
        '\u{a0}', '\u{fffd}', '¢', '£', '¤', '\u{fffd}', '¦', '§', 'Ø', '©', 'Ŗ', '«', '¬',
        '\u{ad}', '®', 'Æ', '°', '±', '²', '³', '´', 'µ', '¶', '·', 'ø', '¹', 'ŗ', '»', '¼', '½',
        '¾', 'æ', 'Ą', 'Į', 'Ā', 'Ć', 'Ä', 'Å', 'Ę', 'Ē', 'Č', 'É', 'Ź', 'Ė', 'Ģ', 'Ķ', 'Ī', 'Ļ',
        'Š', 'Ń', 'Ņ', 'Ó', 'Ō', 'Õ', 'Ö', '×', 'Ų', 'Ł', 'Ś', 'Ū', 'Ü', 'Ż', 'Ž', 'ß', 'ą', 'į',
        'ā', 'ć', 'ä', 'å', 'ę', 'ē', 'č', 'é', 'ź', 'ė', 'ģ', 'ķ', 'ī', 'ļ', 'š', 'ń', 'ņ', 'ó',
        'ō', 'õ', 'ö', '÷', 'ų', 'ł', 'ś', 'ū', 'ü', 'ż', 'ž', '˙',
    ];
    if byte < 0xa0 {
        byte as char
    } else {
        HIGH[(byte - 0xa0) as usize]
    }
}
