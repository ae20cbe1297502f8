pub mod chat;
pub mod config;
pub mod model;
pub mod web;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use tera::Tera;

use model::ModelManager;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

// App state shared by every worker
pub struct AppState {
    pub tera: Tera,
    pub model: ModelManager,
    pub assistant_name: String,
}

impl AppState {
    pub fn new(model: ModelManager, assistant_name: impl Into<String>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("index.html", INDEX_TEMPLATE)?;
        tera.autoescape_on(vec![".html"]);

        Ok(Self {
            tera,
            model,
            assistant_name: assistant_name.into(),
        })
    }
}
