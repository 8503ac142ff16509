//! Caller identity

/// Supplies the owner recorded on newly created knowledge bases.
///
/// Authentication is out of scope; deployments plug a real resolver in here.
pub trait OwnerResolver: Send + Sync + std::fmt::Debug {
    fn owner_id(&self) -> String;
}
