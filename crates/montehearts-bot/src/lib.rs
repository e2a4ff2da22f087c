pub mod bot;

pub use bot::{Bot, BotConfig, BotError, FastPath, PlayPlanner, TableView};
