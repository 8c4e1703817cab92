//! Song recognition - identifies audio files against the Shazam service and
//! turns the match into tags.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types for a recognized track
//! - **API DTOs** (`dto.rs`) - Exact request/response shapes of the service
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models
//! - **Client** (`client.rs`) - HTTP client for the tag and details calls
//! - **Signature** (`signature.rs`) - Audio signature via an external program
//! - **Mapper** (`mapper.rs`) - Flattens a match into a `TagRecord`
//!
//! # Usage
//!
//! ```ignore
//! use recognition::{ShazamClient, SignatureGenerator, map_track, CoverTokens};
//!
//! let settings = config::load(None);
//! let client = ShazamClient::new(
//!     settings.service.clone(),
//!     settings.network.clone(),
//!     SignatureGenerator::new(&settings.signature),
//! )?;
//!
//! if let Some(track) = client.recognize(Path::new("song.mp3")).await? {
//!     let record = map_track(&track, &CoverTokens::from_service(&settings.service));
//!     println!("{} - {}", record.artist, record.title);
//! }
//! ```

pub mod adapter;
pub mod client;
pub mod domain;
pub mod dto;
pub mod mapper;
pub mod signature;
pub mod traits;

pub use client::ShazamClient;
pub use domain::{RecognitionError, RecognizedTrack};
pub use mapper::{CoverTokens, map_track};
pub use signature::SignatureGenerator;
pub use traits::RecognitionApi;
