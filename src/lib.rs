// Library root
// -----------
// The binary (`main.rs`) wires these modules together into the
// interactive status manager.
//
// Module responsibilities:
// - `cli`: command line options and logger setup.
// - `config`: loads the access token and resolves where local files live.
// - `templates`: reads and rewrites the saved status templates.
// - `expiration`: turns a duration or an `HH:MM` time into a timestamp.
// - `api`: talks to the Slack profile endpoints over HTTP.
// - `status`: reads and sets the status on top of `api`.
// - `context`: the session object handed to the menu.
// - `ui`: the terminal menu and its flows.
// - `error`: failure type shared by all of the above.
pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod expiration;
pub mod status;
pub mod templates;
pub mod ui;
