#![deny(rust_2018_idioms)]

pub mod alerts;
pub mod config;
pub mod domain;
pub mod form;
pub mod forms;
mod io;
pub mod layout;
pub mod lookup;
pub mod money;
pub mod session;
pub mod submit;

pub use alerts::{Alert, AlertQueue, AlertSink, AlertStatus};
pub use config::{AppConfig, FrontendUrls};
pub use forms::{CourseForm, MaterialForm, PlanForm, SubscriptionForm};
pub use io::{DocumentFormat, load_document, parse_document_str, render_document};
pub use session::CurrentUser;
pub use submit::{CreateService, FormController, SubmitError, SubmitStatus};

pub mod prelude {
    pub use super::{
        Alert, AlertQueue, AlertSink, AppConfig, CourseForm, CreateService, CurrentUser,
        FormController, MaterialForm, PlanForm, SubmitStatus, SubscriptionForm,
    };
    pub use crate::form::{FieldInput, FileUpload, FormState};
    pub use crate::lookup::{LookupEntity, LookupOutcome, LookupService, SearchSelect};
}
