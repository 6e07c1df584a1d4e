use std::rc::Rc;

use crate::core::config::DashboardConfig;
use crate::core::resolver::{EmbeddedResolver, Resolver};

mod dashboard;
pub use dashboard::Dashboard;

mod knowledge;
pub use knowledge::Knowledge;

/// What a launcher hands the views: configuration plus the case database to read from.
#[derive(Clone)]
pub struct DashboardContext {
    pub config: DashboardConfig,
    pub resolver: Rc<dyn Resolver>,
}

impl DashboardContext {
    pub fn new(config: DashboardConfig, resolver: Rc<dyn Resolver>) -> Self {
        Self { config, resolver }
    }

    /// Configuration defaults over the embedded demo database.
    pub fn embedded(config: DashboardConfig) -> Self {
        Self::new(config, Rc::new(EmbeddedResolver))
    }
}

impl Default for DashboardContext {
    fn default() -> Self {
        Self::embedded(DashboardConfig::default())
    }
}
