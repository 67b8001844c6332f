mod device;

pub use device::{
    Basic, Description, DeviceInfo, DeviceMeta, PhysicalDevice, ResourceCounts,
};
