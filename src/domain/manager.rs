use std::collections::HashSet;

use chrono::NaiveDate;
use derive_more::{Display, Error, From};
use tracing::{debug, info, warn};

use crate::domain::{
    Booking, BookingRepository, Clock, DataAccessError, Entity, Room, RoomId, RoomRepository,
    SystemClock,
};

/// 空室検索と予約作成を行うサービス
///
/// 予約と部屋は呼び出しのたびにストアから読み直し、内部に状態を持たない。
pub struct BookingManager<B, R, C = SystemClock> {
    bookings: B,
    rooms: R,
    clock: C,
}

impl<B, R> BookingManager<B, R>
where
    B: BookingRepository,
    R: RoomRepository,
{
    pub fn new(bookings: B, rooms: R) -> Self {
        Self::with_clock(bookings, rooms, SystemClock)
    }
}

impl<B, R, C> BookingManager<B, R, C>
where
    B: BookingRepository,
    R: RoomRepository,
    C: Clock,
{
    pub fn with_clock(bookings: B, rooms: R, clock: C) -> Self {
        Self {
            bookings,
            rooms,
            clock,
        }
    }

    /// `[start, end]` に空いている最初の部屋を探す
    ///
    /// 開始日は明日以降、かつ終了日以前でなければならない。部屋はストアの並び順で
    /// 評価される。空室がなければ `None` を返す。
    pub async fn find_available_room(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<RoomId>, BookingError> {
        self.validate_stay(start, end)?;
        let (bookings, rooms) =
            tokio::try_join!(self.bookings.find_all(), self.rooms.find_all())?;
        let occupied = occupied_rooms(&bookings, start, end);
        debug!(%start, %end, ?occupied, "conflicting rooms");
        Ok(rooms
            .iter()
            .map(Entity::id)
            .find(|id| !occupied.contains(id)))
    }

    /// 空室を割り当てて予約を保存する
    ///
    /// 空室がない場合は保存せずに `false` を返す。保存された場合、`booking` は
    /// 割り当てられた部屋とストアが採番したIDで更新される。
    ///
    /// 同じ期間への同時呼び出しは同じ部屋を二重に割り当てうる。防ぐのは
    /// [`BookingRepository`] 側の責務。
    pub async fn create_booking(&self, booking: &mut Booking) -> Result<bool, BookingError> {
        let room_id = match self
            .find_available_room(booking.start_date(), booking.end_date())
            .await?
        {
            Some(room_id) => room_id,
            None => {
                debug!(
                    start = %booking.start_date(),
                    end = %booking.end_date(),
                    "no room available"
                );
                return Ok(false);
            }
        };
        booking.assign_room(room_id);
        *booking = self.bookings.add(booking).await?;
        info!(
            booking_id = %booking.id(),
            %room_id,
            start = %booking.start_date(),
            end = %booking.end_date(),
            "booking created"
        );
        Ok(true)
    }

    /// `[start, end]` のうち全室が埋まっている日付を昇順で返す
    pub async fn fully_occupied_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, BookingError> {
        if start > end {
            return Err(InvalidDateRange::StartAfterEnd { start, end }.into());
        }
        let (bookings, rooms) =
            tokio::try_join!(self.bookings.find_all(), self.rooms.find_all())?;
        if rooms.is_empty() || !bookings.iter().any(Booking::is_active) {
            return Ok(Vec::new());
        }
        Ok(start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| bookings.iter().filter(|b| b.occupies(*date)).count() >= rooms.len())
            .collect())
    }

    pub async fn find_room(&self, id: RoomId) -> Result<Option<Room>, BookingError> {
        Ok(self.rooms.find_by_id(id).await?)
    }

    fn validate_stay(&self, start: NaiveDate, end: NaiveDate) -> Result<(), InvalidDateRange> {
        let today = self.clock.today();
        let result = if start <= today {
            Err(InvalidDateRange::StartNotInFuture { start, today })
        } else if start > end {
            Err(InvalidDateRange::StartAfterEnd { start, end })
        } else {
            Ok(())
        };
        if let Err(e) = &result {
            warn!("rejected date range: {}", e);
        }
        result
    }
}

fn occupied_rooms(bookings: &[Booking], start: NaiveDate, end: NaiveDate) -> HashSet<RoomId> {
    bookings
        .iter()
        .filter(|b| b.conflicts_with(start, end))
        .filter_map(Booking::room_id)
        .collect()
}

/// 予約サービスのエラー
#[derive(Error, Display, Debug, From)]
pub enum BookingError {
    /// 日付の範囲が不正です
    #[display(fmt = "Invalid argument: {}", _0)]
    InvalidArgument(#[error(source)] InvalidDateRange),
    /// ストアのエラー
    #[display(fmt = "Store failure: {}", _0)]
    Store(#[error(source)] DataAccessError),
}

/// 不正な日付の範囲
#[derive(Error, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidDateRange {
    #[display(fmt = "The start date {} must be later than today ({})", start, today)]
    StartNotInFuture { start: NaiveDate, today: NaiveDate },
    #[display(fmt = "The start date {} is later than the end date {}", start, end)]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}
