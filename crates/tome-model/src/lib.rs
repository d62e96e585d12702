//! Record model for the Tome reference browser.
//!
//! - `record` - [`Record`] and [`RecordId`]
//! - `set` - flat [`RecordSet`]s with [`Placement`] rules
//! - `section` - top-level [`Section`]s
//! - `resolve` - the [`ResolveRecord`] contract used to revive stored ids

mod error;
mod record;
mod resolve;
mod section;
mod set;

pub use error::{ModelError, Result};
pub use record::{Record, RecordId};
pub use resolve::ResolveRecord;
pub use section::Section;
pub use set::{Placement, RecordSet};
