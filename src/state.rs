use crate::{
    config::{RuntimeConfiguration, StoreConfig},
    data::{StudentStore, memory_store::MemoryStudentStore, postgres_store::PostgresStudentStore},
    error::RosterResult,
    maud_conveniences::render_nav,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use sqlx::postgres::PgPoolOptions;
use std::{ops::Deref, sync::Arc};

const SEND_ERROR_SCRIPT: &str = r#"
document.addEventListener("htmx:sendError", () => {
    document.getElementById("flash").innerHTML =
        '<div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded mb-4" role="alert">Unable to reach the server. Please try again.</div>';
});
"#;

const INDICATOR_STYLE: &str = r".htmx-request .idle-label { display: none; } .busy-label { display: none; } .htmx-request .busy-label { display: inline; }";

#[derive(Clone, Debug)]
pub struct RosterState {
    store: Arc<dyn StudentStore>,
}

impl RosterState {
    pub async fn new(config: &RuntimeConfiguration) -> RosterResult<Self> {
        let store: Arc<dyn StudentStore> = match config.store() {
            StoreConfig::Postgres(db_config) => {
                let options = PgPoolOptions::new().max_connections(db_config.max_connections());
                Arc::new(PostgresStudentStore::connect(options, db_config).await?)
            }
            StoreConfig::Memory => {
                warn!("Using the in-memory store, records will be lost on shutdown");
                Arc::new(MemoryStudentStore::default())
            }
        };

        Ok(Self::from_store(store))
    }

    pub fn from_store(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    style { (PreEscaped(INDICATOR_STYLE)) }
                    title { "Student Records" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (render_nav())
                    main class="w-full max-w-5xl p-4" {
                        div id="flash" {}
                        (markup)
                    }
                    script { (PreEscaped(SEND_ERROR_SCRIPT)) }
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) {
        self.store.close().await;
    }
}

impl Deref for RosterState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
