use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use backend_storage::trip::{
    Trip, TripStorageError, TripStorageResult, TripStore, Visibility,
};

/// In-memory trip table keyed like the real one: `(UserID, TripID)`
#[derive(Default)]
pub struct InMemoryTripStore {
    trips: Mutex<BTreeMap<(String, String), Trip>>,
}

impl InMemoryTripStore {
    pub fn with_trips(trips: impl IntoIterator<Item = Trip>) -> Self {
        let store = Self::default();
        {
            let mut map = store.trips.lock().unwrap();
            for trip in trips {
                map.insert((trip.user_id.clone(), trip.trip_id.clone()), trip);
            }
        }
        store
    }

    pub fn stored(&self, user_id: &str, trip_id: &str) -> Option<Trip> {
        self.trips
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), trip_id.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.trips.lock().unwrap().len()
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn put(&self, trip: &Trip) -> TripStorageResult<()> {
        self.trips.lock().unwrap().insert(
            (trip.user_id.clone(), trip.trip_id.clone()),
            trip.clone(),
        );
        Ok(())
    }

    async fn get_one(&self, user_id: &str, trip_id: &str) -> TripStorageResult<Option<Trip>> {
        Ok(self.stored(user_id, trip_id))
    }

    async fn list_by_user(&self, user_id: &str) -> TripStorageResult<Vec<Trip>> {
        Ok(self
            .trips
            .lock()
            .unwrap()
            .values()
            .filter(|trip| trip.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_public(&self) -> TripStorageResult<Vec<Trip>> {
        Ok(self
            .trips
            .lock()
            .unwrap()
            .values()
            .filter(|trip| trip.visibility == Visibility::Public)
            .cloned()
            .collect())
    }

    async fn update_visibility(
        &self,
        user_id: &str,
        trip_id: &str,
        visibility: Visibility,
    ) -> TripStorageResult<Trip> {
        let mut trips = self.trips.lock().unwrap();
        let trip = trips
            .get_mut(&(user_id.to_string(), trip_id.to_string()))
            .ok_or(TripStorageError::TripNotFound)?;
        trip.visibility = visibility;
        Ok(trip.clone())
    }

    async fn delete(&self, user_id: &str, trip_id: &str) -> TripStorageResult<()> {
        self.trips
            .lock()
            .unwrap()
            .remove(&(user_id.to_string(), trip_id.to_string()))
            .map(|_| ())
            .ok_or(TripStorageError::TripNotFound)
    }
}

/// Store whose every operation fails, for exercising the 500 path
pub struct FailingTripStore;

#[async_trait]
impl TripStore for FailingTripStore {
    async fn put(&self, _trip: &Trip) -> TripStorageResult<()> {
        Err(TripStorageError::SerializationError("table unavailable".to_string()))
    }

    async fn get_one(&self, _user_id: &str, _trip_id: &str) -> TripStorageResult<Option<Trip>> {
        Err(TripStorageError::SerializationError("table unavailable".to_string()))
    }

    async fn list_by_user(&self, _user_id: &str) -> TripStorageResult<Vec<Trip>> {
        Err(TripStorageError::SerializationError("table unavailable".to_string()))
    }

    async fn list_public(&self) -> TripStorageResult<Vec<Trip>> {
        Err(TripStorageError::SerializationError("table unavailable".to_string()))
    }

    async fn update_visibility(
        &self,
        _user_id: &str,
        _trip_id: &str,
        _visibility: Visibility,
    ) -> TripStorageResult<Trip> {
        Err(TripStorageError::SerializationError("table unavailable".to_string()))
    }

    async fn delete(&self, _user_id: &str, _trip_id: &str) -> TripStorageResult<()> {
        Err(TripStorageError::SerializationError("table unavailable".to_string()))
    }
}

/// Store whose public scan never finishes within the request timeout
pub struct SlowTripStore;

#[async_trait]
impl TripStore for SlowTripStore {
    async fn put(&self, _trip: &Trip) -> TripStorageResult<()> {
        Ok(())
    }

    async fn get_one(&self, _user_id: &str, _trip_id: &str) -> TripStorageResult<Option<Trip>> {
        Ok(None)
    }

    async fn list_by_user(&self, _user_id: &str) -> TripStorageResult<Vec<Trip>> {
        Ok(Vec::new())
    }

    async fn list_public(&self) -> TripStorageResult<Vec<Trip>> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn update_visibility(
        &self,
        _user_id: &str,
        _trip_id: &str,
        _visibility: Visibility,
    ) -> TripStorageResult<Trip> {
        Err(TripStorageError::TripNotFound)
    }

    async fn delete(&self, _user_id: &str, _trip_id: &str) -> TripStorageResult<()> {
        Err(TripStorageError::TripNotFound)
    }
}
