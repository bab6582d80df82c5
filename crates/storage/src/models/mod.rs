mod attendee;
mod score;

pub use attendee::{Attendee, NewAttendee};
pub use score::Score;
