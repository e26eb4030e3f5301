pub mod clock;
pub mod room_code;
