mod json;
mod memory;

use std::{io, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::domain::{Booking, DataAccessError, Entity};

pub use self::json::*;
pub use self::memory::*;

impl From<serde_json::Error> for DataAccessError {
    fn from(value: serde_json::Error) -> Self {
        DataAccessError::ClientSideError(Box::new(value))
    }
}

/// ファイルからエンティティの配列を読み込む。`missing_ok` ならファイルがなくても空を返す
async fn read_collection<E>(path: &Path, missing_ok: bool) -> Result<Vec<E>, DataAccessError>
where
    E: Entity + DeserializeOwned,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if missing_ok && e.kind() == io::ErrorKind::NotFound => {
            debug!(entity = E::ENTITY_NAME, path = %path.display(), "no file, empty collection");
            return Ok(Vec::new());
        }
        Err(e) => return Err(DataAccessError::ReadError(Box::new(e))),
    };
    let entities: Vec<E> = serde_json::from_slice(&bytes)?;
    debug!(
        entity = E::ENTITY_NAME,
        path = %path.display(),
        count = entities.len(),
        "collection loaded"
    );
    Ok(entities)
}

/// エンティティの配列をファイルに書き込む
async fn write_collection<E>(path: &Path, entities: &[E]) -> Result<(), DataAccessError>
where
    E: Entity + Serialize,
{
    let bytes = serde_json::to_vec_pretty(entities)?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| DataAccessError::WriteError(Box::new(e)))?;
    debug!(
        entity = E::ENTITY_NAME,
        path = %path.display(),
        count = entities.len(),
        "collection written"
    );
    Ok(())
}

/// 保存する予約のIDを決める
///
/// 未採番なら保存済みの最大IDの次を振る。採番済みのIDが既に使われていれば拒否する。
fn stamp_booking_id(bookings: &[Booking], entity: &Booking) -> Result<Booking, DataAccessError> {
    let mut entity = entity.clone();
    if entity.id().is_assigned() {
        if bookings.iter().any(|b| b.id() == entity.id()) {
            return Err(DataAccessError::WriteError(
                format!("booking id {} is already taken", entity.id()).into(),
            ));
        }
        return Ok(entity);
    }
    let last = bookings.iter().map(Entity::id).max().unwrap_or_default();
    let id = last
        .next()
        .ok_or_else(|| DataAccessError::WriteError("booking ids are exhausted".into()))?;
    entity.assign_id(id);
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::BookingId;

    use super::*;

    fn booking(id: u64) -> Booking {
        let date = NaiveDate::from_ymd_opt(2027, 2, 1).unwrap();
        Booking::create(BookingId::from(id), 1.into(), date, date, true)
    }

    #[test]
    fn test_stamp_booking_id() {
        let date = NaiveDate::from_ymd_opt(2027, 2, 3).unwrap();
        let request = Booking::request(date, date);
        assert_eq!(
            stamp_booking_id(&[], &request).unwrap().id(),
            BookingId::from(1)
        );
        assert_eq!(
            stamp_booking_id(&[booking(7), booking(3)], &request)
                .unwrap()
                .id(),
            BookingId::from(8)
        );
        assert_eq!(
            stamp_booking_id(&[booking(7)], &booking(9)).unwrap(),
            booking(9)
        );
        assert!(matches!(
            stamp_booking_id(&[booking(7)], &booking(7)),
            Err(DataAccessError::WriteError(_))
        ));
        assert!(matches!(
            stamp_booking_id(&[booking(u64::MAX)], &request),
            Err(DataAccessError::WriteError(_))
        ));
    }
}
