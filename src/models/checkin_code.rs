/// A check-in code. Personal codes are bound to one worker, shared codes
/// (`target_worker_id == None`) can be used by anyone at a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinCode {
    pub id: i64,
    pub code: String,
    pub is_active: bool,
    pub target_worker_id: Option<i64>,
}

