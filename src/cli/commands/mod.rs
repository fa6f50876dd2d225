pub mod auth;
pub mod forms;
pub mod settings;
pub mod sheets;

pub use auth::{AuthCommands, handle_auth_command};
pub use forms::{FormsCommands, handle_forms_command};
pub use settings::{SettingsCommands, handle_settings_command};
pub use sheets::{SheetsCommands, handle_sheets_command};
