pub mod attendee;
pub mod checkin;
pub mod dashboard;
pub mod import;
pub mod scoreboard;
