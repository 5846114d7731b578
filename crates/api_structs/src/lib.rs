mod appointment;
mod delivery;
mod dispatch;
mod reminder_schedule;
mod send_record;
mod status;
mod template;
mod tenant;

pub mod dtos {
    pub use crate::appointment::dtos::*;
    pub use crate::reminder_schedule::dtos::*;
    pub use crate::send_record::dtos::*;
    pub use crate::template::dtos::*;
    pub use crate::tenant::dtos::*;
}

pub use crate::appointment::api::*;
pub use crate::delivery::api::*;
pub use crate::dispatch::api::*;
pub use crate::reminder_schedule::api::*;
pub use crate::send_record::api::*;
pub use crate::status::api::*;
pub use crate::template::api::*;
pub use crate::tenant::api::*;
