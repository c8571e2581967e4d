pub mod chrome;

pub use chrome::ChromeBrowser;
