//! The multi-step import wizard.
//!
//! [`WizardSession`] walks one upload through four steps: choose a file,
//! preview it, configure fields, and save. Saving goes through a
//! [`FormStore`]; [`MemoryFormStore`] keeps forms in memory.
//!
//! ```ignore
//! let mut session = WizardSession::new();
//! session.upload(SourceFile::from_path(path)?, IngestOptions::default()).await?;
//! session.apply(WizardAction::Next)?;
//! let form = session.save(&mut store, Utc::now())?;
//! ```

mod error;
mod progress;
mod session;
mod step;
mod store;

pub use error::{Result, SaveError, WizardError};
pub use progress::{PROGRESS_CEILING, PROGRESS_STEP, PROGRESS_TICK, ProgressReporter};
pub use session::{FileMeta, RowRole, Transition, WizardAction, WizardSession};
pub use step::{ImportStep, WizardState};
pub use store::{FormStore, MemoryFormStore, edit_form};
