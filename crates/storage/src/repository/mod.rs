pub mod attendee;
pub mod scoreboard;
