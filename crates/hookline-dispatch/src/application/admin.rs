//! Destination administration: read and wholesale-replace one platform's
//! configuration.

use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::platform::Platform;
use hookline_core::store::{ConfigStore, DestinationMap};
use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::commands::SaveDestinations;

/// Read-only view of one platform's destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationsView {
    /// The platform.
    pub platform: Platform,
    /// Configured URLs by category. Unconfigured categories are absent.
    pub destinations: DestinationMap,
}

/// Loads the current destinations of `platform`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the configuration cannot be read.
pub async fn load_destinations(
    platform: Platform,
    store: &dyn ConfigStore,
) -> Result<DestinationsView, DomainError> {
    let destinations = store.get_all(platform).await?;
    Ok(DestinationsView {
        platform,
        destinations,
    })
}

/// Handles the `SaveDestinations` command: writes every category of the
/// platform, clearing the ones absent from the command, then returns the
/// stored configuration.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if any write fails. Categories
/// written before the failure keep their new value.
#[instrument(skip(command, store), fields(correlation_id = %command.correlation_id, platform = %command.platform))]
pub async fn handle_save_destinations(
    command: &SaveDestinations,
    store: &dyn ConfigStore,
) -> Result<DestinationsView, DomainError> {
    for category in EventCategory::ALL {
        let url = command
            .destinations
            .get(&category)
            .map_or("", String::as_str);
        store.set(command.platform, category, url).await?;
    }
    info!(
        configured = command
            .destinations
            .values()
            .filter(|url| !url.trim().is_empty())
            .count(),
        "destinations replaced"
    );
    load_destinations(command.platform, store).await
}
