// Everything the menu needs, built once at startup and passed down
// explicitly.

use crate::api::ProfileApi;
use crate::config::Config;
use crate::status::StatusClient;
use crate::templates::TemplateStore;

pub struct Session<A> {
    pub config: Config,
    pub status: StatusClient<A>,
    pub templates: TemplateStore,
}

impl<A: ProfileApi> Session<A> {
    pub fn new(config: Config, api: A, templates: TemplateStore) -> Self {
        Session {
            config,
            status: StatusClient::new(api),
            templates,
        }
    }
}
