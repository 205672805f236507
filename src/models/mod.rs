pub mod booking;
pub mod cabin;
pub mod guest;
pub mod settings;
pub mod status;

pub use booking::{
    Booking, BookingDetail, BookingListQuery, BookingPage, BookingSort, BookingSummary, NewBooking,
    StayPrice,
};
pub use cabin::{Cabin, CabinInput};
pub use guest::{Guest, GuestInput};
pub use settings::{Settings, SettingsPatch};
pub use status::{BookingStatus, StatusMeta, TransitionError};
