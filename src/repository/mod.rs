pub mod decode;
pub mod identity;
pub mod local;
pub mod normalize;
pub mod remote;
pub mod traits;

pub use local::LocalPropertyRepository;
pub use remote::RemotePropertyRepository;
pub use traits::PropertyRepository;
