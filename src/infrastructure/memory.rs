use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    Booking, BookingRepository, DataAccessError, Entity, Room, RoomId, RoomRepository,
};
use crate::infrastructure::stamp_booking_id;

/// メモリ上の部屋リポジトリ
#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    rooms: Vec<Room>,
}

impl InMemoryRoomRepository {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_all(&self) -> Result<Vec<Room>, DataAccessError> {
        Ok(self.rooms.clone())
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError> {
        Ok(self.rooms.iter().find(|r| r.id() == id).cloned())
    }
}

/// メモリ上の予約リポジトリ
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: RwLock::new(bookings),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_all(&self) -> Result<Vec<Booking>, DataAccessError> {
        Ok(self.bookings.read().await.clone())
    }

    async fn add(&self, entity: &Booking) -> Result<Booking, DataAccessError> {
        let mut bookings = self.bookings.write().await;
        let entity = stamp_booking_id(&bookings, entity)?;
        bookings.push(entity.clone());
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::BookingId;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, day).unwrap()
    }

    #[tokio::test]
    async fn test_room_repository() {
        let repo = InMemoryRoomRepository::new(vec![
            Room::new(3.into(), "C".to_owned()),
            Room::new(1.into(), "A".to_owned()),
        ]);
        let ids = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(Entity::id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![RoomId::from(3), RoomId::from(1)]);
        assert_eq!(
            repo.find_by_id(1.into()).await.unwrap(),
            Some(Room::new(1.into(), "A".to_owned()))
        );
        assert_eq!(repo.find_by_id(2.into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_booking_repository_assigns_ids() {
        let repo = InMemoryBookingRepository::new(vec![Booking::create(
            BookingId::from(5),
            1.into(),
            date(1),
            date(2),
            true,
        )]);
        let mut request = Booking::request(date(3), date(4));
        request.assign_room(2.into());
        let stored = repo.add(&request).await.unwrap();
        assert_eq!(stored.id(), BookingId::from(6));
        assert_eq!(stored.room_id(), Some(RoomId::from(2)));

        let kept = Booking::create(BookingId::from(42), 1.into(), date(5), date(6), true);
        assert_eq!(repo.add(&kept).await.unwrap(), kept);
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_booking_repository_rejects_taken_id() {
        let existing = Booking::create(BookingId::from(1), 1.into(), date(1), date(2), true);
        let repo = InMemoryBookingRepository::new(vec![existing.clone()]);
        let duplicate = Booking::create(BookingId::from(1), 2.into(), date(3), date(4), true);
        assert!(matches!(
            repo.add(&duplicate).await,
            Err(DataAccessError::WriteError(_))
        ));
        assert_eq!(repo.find_all().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn test_booking_repository_exhausted_ids() {
        let existing = Booking::create(BookingId::from(u64::MAX), 1.into(), date(1), date(2), true);
        let repo = InMemoryBookingRepository::new(vec![existing]);
        let mut request = Booking::request(date(3), date(4));
        request.assign_room(2.into());
        assert!(matches!(
            repo.add(&request).await,
            Err(DataAccessError::WriteError(_))
        ));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
