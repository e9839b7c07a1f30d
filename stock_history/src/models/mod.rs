pub mod bar;
pub mod bar_series;
pub mod price_bar;
pub mod request_params;
pub mod timeframe;
