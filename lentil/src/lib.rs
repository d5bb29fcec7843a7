//! Density plots of posterior draws.
//!
//! [`densityplot::density_plot`] lays out one panel per scalar variable
//! and overlays every dataset in its own color: a kernel density estimate
//! over the credible interval for continuous draws, a histogram for
//! discrete ones. The result is a [`figure::Figure`] that
//! [`backend::save_figure`] renders to SVG or PNG.

pub mod backend;
pub mod color;
pub mod density;
pub mod densityplot;
pub mod figure;
pub mod options;
pub mod report;
pub mod style;

pub use color::{Color, ColorSpec};
pub use densityplot::{density_plot, density_plot_with, PosteriorInput};
pub use figure::{Artist, Figure, Panel};
pub use options::{DensityPlotOptions, MarkerGlyph, PointEstimate};
pub use style::PlotStyle;
