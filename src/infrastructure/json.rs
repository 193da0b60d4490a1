use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Booking, BookingRepository, DataAccessError, Entity, Room, RoomId, RoomRepository,
};
use crate::infrastructure::{read_collection, stamp_booking_id, write_collection};

/// JSONファイルの部屋リポジトリ
#[derive(Clone, Debug)]
pub struct JsonRoomRepository {
    path: PathBuf,
}

impl JsonRoomRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

#[async_trait]
impl RoomRepository for JsonRoomRepository {
    async fn find_all(&self) -> Result<Vec<Room>, DataAccessError> {
        read_collection(&self.path, false).await
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError> {
        Ok(read_collection::<Room>(&self.path, false)
            .await?
            .into_iter()
            .find(|r| r.id() == id))
    }
}

/// JSONファイルの予約リポジトリ
///
/// ファイルがなければ予約は空として扱い、最初の追加で作成する。
#[derive(Debug)]
pub struct JsonBookingRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonBookingRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl BookingRepository for JsonBookingRepository {
    async fn find_all(&self) -> Result<Vec<Booking>, DataAccessError> {
        read_collection(&self.path, true).await
    }

    async fn add(&self, entity: &Booking) -> Result<Booking, DataAccessError> {
        let _guard = self.write_lock.lock().await;
        let mut bookings = read_collection::<Booking>(&self.path, true).await?;
        let entity = stamp_booking_id(&bookings, entity)?;
        bookings.push(entity.clone());
        write_collection(&self.path, &bookings).await?;
        Ok(entity)
    }
}
