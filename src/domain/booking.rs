use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Entity, Id, RoomId};

/// 予約のリポジトリトレイト
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 全ての予約を取得する
    async fn find_all(&self) -> Result<Vec<Booking>, DataAccessError>;
    /// 予約を追加し、IDが採番された予約を返す
    async fn add(&self, entity: &Booking) -> Result<Booking, DataAccessError>;
}

#[async_trait]
impl<T: BookingRepository + ?Sized> BookingRepository for Arc<T> {
    async fn find_all(&self) -> Result<Vec<Booking>, DataAccessError> {
        (**self).find_all().await
    }

    async fn add(&self, entity: &Booking) -> Result<Booking, DataAccessError> {
        (**self).add(entity).await
    }
}

/// 予約のID。0は未採番
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Deref,
    Default,
)]
pub struct BookingId(u64);

impl BookingId {
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// 次のID。使い切っていれば `None`
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Id for BookingId {
    type Inner = u64;
}

/// 予約エンティティ
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    id: BookingId,
    #[serde(default)]
    room_id: Option<RoomId>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    is_active: bool,
}

impl Booking {
    /// 部屋が未割り当ての予約リクエストを作成する
    pub fn request(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            ..Default::default()
        }
    }

    pub fn create(
        id: BookingId,
        room_id: RoomId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            room_id: Some(room_id),
            start_date,
            end_date,
            is_active,
        }
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// ストアが採番したIDを設定する
    pub fn assign_id(&mut self, id: BookingId) {
        self.id = id;
    }

    /// 部屋を割り当てて有効にする
    pub fn assign_room(&mut self, room_id: RoomId) {
        self.room_id = Some(room_id);
        self.is_active = true;
    }

    /// `[start, end]` と重なる有効な予約か。両端を含む
    pub fn conflicts_with(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.is_active
            && self.room_id.is_some()
            && self.start_date <= end
            && start <= self.end_date
    }

    /// `date` の夜に部屋を占有しているか
    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.conflicts_with(date, date)
    }
}

impl Entity for Booking {
    type Id = BookingId;

    const ENTITY_NAME: &'static str = "booking";

    fn id(&self) -> Self::Id {
        self.id
    }
}
