use chrono::{DateTime, Utc};

pub(crate) mod helper {
    #[cfg(not(test))]
    pub use super::get_utc_now;
    #[cfg(test)]
    pub use super::mock_chrono::{get_utc_now, set_utc_now};
}

/// timestamps cross the api as seconds-precision iso-8601
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}


#[cfg(not(test))]
pub fn get_utc_now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mocked_clock_is_settable() {
        helper::set_utc_now(1_700_000_000);
        assert_eq!(helper::get_utc_now().timestamp(), 1_700_000_000);
        assert_eq!(format_ts(helper::get_utc_now()), "2023-11-14T22:13:20");
    }
}
