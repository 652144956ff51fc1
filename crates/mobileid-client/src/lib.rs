//! Mobile-ID authentication client.
//!
//! Authenticates end users through the national mobile-identity provider:
//! the relying application creates a session, the user confirms a PIN prompt
//! on their phone, and the application polls until the provider reports a
//! terminal result, then extracts the verified identity from the
//! authentication certificate.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mobileid_client::{
//!     AuthClient, ClientConfig, MobileIdClient, WorkerPool, WorkerPoolConfig,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), mobileid_client::AuthError> {
//! let config = ClientConfig::new("DEMO", "00000000-0000-0000-0000-000000000000");
//! let client = Arc::new(AuthClient::new(config)?);
//!
//! let pool = WorkerPool::new(client.clone(), WorkerPoolConfig::new(50, 100)?);
//! let token = CancellationToken::new();
//! pool.start(token.clone()).await;
//!
//! let session = client.create_session("+37269930366", "51307149560").await?;
//! println!("verification code: {}", session.verification_code);
//!
//! let result = pool.process(&token, session.id).await;
//! match result.await {
//!     Ok(Ok(person)) => println!("authenticated: {} {}", person.first_name, person.last_name),
//!     Ok(Err(err)) => println!("failed: {err}"),
//!     Err(_) => println!("job dropped"),
//! }
//! pool.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod challenge;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod session;
pub mod worker;

pub use challenge::HashAlgorithm;
pub use client::{AuthClient, MobileIdClient};
pub use config::ClientConfig;
pub use error::AuthError;
pub use http::{HttpTransport, Transport};
pub use model::{Person, Session};
pub use session::{PollOutcome, RejectionReason};
pub use worker::{JobResult, WorkerPool, WorkerPoolConfig};

#[cfg(feature = "mock")]
pub use client::MockMobileIdClient;
#[cfg(feature = "mock")]
pub use http::MockTransport;
