use crate::analyzers::types::StationStats;
use crate::analyzers::utility::mode;
use crate::loader::Dataset;

/// Most used start station, end station and start/end combination.
pub fn station_stats(dataset: &Dataset) -> StationStats {
    let trips = &dataset.trips;
    StationStats {
        start_station: mode(trips.iter().map(|t| t.start_station.clone())),
        end_station: mode(trips.iter().map(|t| t.end_station.clone())),
        trip: mode(
            trips
                .iter()
                .map(|t| (t.start_station.clone(), t.end_station.clone())),
        ),
    }
}
