use service::clock::ClockService;
use time::{OffsetDateTime, PrimitiveDateTime};

pub struct ClockServiceImpl;

impl ClockService for ClockServiceImpl {
    fn date_time_now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(now.date(), now.time())
    }
}
