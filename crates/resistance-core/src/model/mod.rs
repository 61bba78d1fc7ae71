pub mod mission;
pub mod player;
pub mod round;
pub mod rules;
pub mod team;
