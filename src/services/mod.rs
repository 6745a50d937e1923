//! Services layer
//!
//! One service per admin section plus the public site content. Every
//! service takes the [`Backend`](crate::backend::Backend) it works against
//! as a constructor argument and owns the view state of its section.

pub mod applications;
pub mod gallery;
pub mod in_flight;
pub mod messages;
pub mod prompt;
pub mod public;
pub mod session;
pub mod stats;

pub use applications::ApplicationsTriage;
pub use gallery::{GalleryManager, PostDraft};
pub use in_flight::{InFlight, InFlightToken, OperationKey};
pub use messages::MessagesTriage;
pub use prompt::{DynPrompt, LogPrompt, UserPrompt};
pub use public::{ApplicationForm, ContactForm, PublicGallery, PublicStats};
pub use session::{AuthService, GuardOutcome, SessionGuard};
pub use stats::StatsEditor;
