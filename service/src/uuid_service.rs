use mockall::automock;
use uuid::Uuid;

#[automock]
pub trait UuidService {
    /// `usage` names the purpose of the id and only helps when tracing or mocking.
    fn new_uuid(&self, usage: &str) -> Uuid;
}
