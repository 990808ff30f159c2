mod controller;
mod state;
mod step;

pub use controller::{ProcessingObserver, Wizard};
pub use state::{Activity, WizardState};
pub use step::{Step, UnknownStep};
