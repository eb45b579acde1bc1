// Dashboard domain model
use super::analytics::Analytics;
use super::chart::{ChartData, TileData};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub analytics: Analytics,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
}

impl Dashboard {
    pub fn new(title: String, analytics: Analytics, tiles: Vec<TileData>, charts: Vec<ChartData>) -> Self {
        Self {
            title,
            analytics,
            tiles,
            charts,
        }
    }
}
