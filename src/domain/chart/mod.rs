//! Chart contract: layout, colours, the index scale and the surface seam.

pub mod frame;
pub mod scale;
pub mod value_objects;

pub use frame::{ChartFrame, ChartSurface, PlotGeometry};
pub use scale::DiscontinuousScale;
pub use value_objects::{
    CandleColor, ChartLayout, Margin, VOLUME_FILL, VisibleWindow, close_color,
};
