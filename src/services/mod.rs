// TrackerLens services
// Stateless engines: host classification, party detection, histogram and view projections, settings.

pub mod domain_classifier;
pub mod histogram_builder;
pub mod popup_view;
pub mod report_view;
pub mod settings_engine;
pub mod third_party_detector;
