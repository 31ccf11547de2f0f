use crate::{
    booking::{ParkingController, ParkingSnapshot},
    catalog::City,
    parking::{Reservation, Selection, Spot, SpotId},
    settings::ParkingSettings,
    AppState,
};

fn controller_from_state(state: &AppState) -> ParkingController {
    state.parking.clone()
}

pub async fn get_parking_state(state: &AppState) -> Result<ParkingSnapshot, String> {
    let controller = controller_from_state(state);
    Ok(controller.snapshot().await)
}

pub async fn list_free_spots(state: &AppState) -> Result<Vec<Spot>, String> {
    let controller = controller_from_state(state);
    Ok(controller.free_spots().await)
}

pub fn list_cities(state: &AppState) -> Result<Vec<City>, String> {
    Ok(state.catalog.cities().to_vec())
}

pub fn list_malls(state: &AppState, city: &str) -> Result<Vec<String>, String> {
    match state.catalog.city(city) {
        Some(city) => Ok(city.malls.clone()),
        None => Err(format!("unknown city '{city}'")),
    }
}

pub fn list_durations(state: &AppState) -> Result<Vec<u32>, String> {
    Ok(state.catalog.durations().to_vec())
}

pub fn get_settings(state: &AppState) -> Result<ParkingSettings, String> {
    Ok(state.settings.clone())
}

pub async fn book_spot(state: &AppState, selection: Selection) -> Result<Reservation, String> {
    let controller = controller_from_state(state);
    controller
        .book(&selection)
        .await
        .map_err(|e| e.to_string())
}

pub async fn cancel_reservation(state: &AppState) -> Result<SpotId, String> {
    let controller = controller_from_state(state);
    controller
        .cancel()
        .await
        .map(|release| release.spot_id)
        .map_err(|e| e.to_string())
}

pub async fn regenerate_spots(state: &AppState) -> Result<ParkingSnapshot, String> {
    let controller = controller_from_state(state);
    Ok(controller.regenerate().await)
}
