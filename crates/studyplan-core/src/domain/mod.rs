//! Domain model (ids, dates, tasks, errors).

pub mod date;
pub mod errors;
pub mod ids;
pub mod legacy;
pub mod task;

pub use date::{DateError, TaskDate};
pub use errors::{ErrorKind, StoreError};
pub use ids::{Credential, OwnerId, TaskId};
pub use task::{Category, NewTask, Priority, Subject, Task, ValidationError};
