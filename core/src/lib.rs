pub mod backend;
pub mod config;
pub mod map;
pub mod notice;
pub mod passport;
pub mod scan;
pub mod serde_defaults;
pub mod session;
pub mod storage;
pub mod venues;

// Re-exports for convenience
pub use backend::{BackendError, IdentityBackend, RestClient, VenueBackend};
pub use config::{AppConfig, ConfigError};
pub use map::{PanState, PlaneProjection, Point, place_pins};
pub use notice::{Notice, NoticeLevel};
pub use passport::{PassportSummary, Stamp, stamps};
pub use scan::{
    CameraError, CameraRequest, CameraStream, ManualCheck, QrDecoder, RgbaFrame, RqrrDecoder,
    ScanPhase, ScanPipeline, ScanStep,
};
pub use session::{AuthFlow, AuthMode, Credentials, SessionState, resolve_session};
pub use storage::{KeyValueStore, MemoryStorage, StorageError};
pub use venues::{ClaimError, ClaimOutcome, LinkOpener, LoadError, VenueStore, claim_stamp};

pub use passport_types as types;
