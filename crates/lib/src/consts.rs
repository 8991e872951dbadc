//! Well-known names shared by the service and its callers.

/// Application name; the CLI binary's command name.
pub const APP_NAME: &str = "biosconf";

/// Default directory for persisted BIOS state.
pub const DEFAULT_PERSIST_PATH: &str = "/var/lib/bios-settings-manager";

/// Environment variable overriding [`DEFAULT_PERSIST_PATH`].
pub const PERSIST_PATH_ENV: &str = "BIOS_PERSIST_PATH";

/// Well-known bus name the service claims.
pub const SERVICE_NAME: &str = "xyz.openbmc_project.BIOSConfigManager";

pub const MANAGER_OBJECT_PATH: &str = "/xyz/openbmc_project/bios_config/manager";
pub const MANAGER_INTERFACE: &str = "xyz.openbmc_project.BIOSConfig.Manager";

pub const PASSWORD_OBJECT_PATH: &str = "/xyz/openbmc_project/bios_config/password";
pub const PASSWORD_INTERFACE: &str = "xyz.openbmc_project.BIOSConfig.Password";

pub const SECURE_BOOT_OBJECT_PATH: &str = "/xyz/openbmc_project/bios_config/secure_boot";
pub const SECURE_BOOT_INTERFACE: &str = "xyz.openbmc_project.BIOSConfig.SecureBoot";

pub const BOOT_ORDER_OBJECT_PATH: &str = "/xyz/openbmc_project/bios_config/boot_order";
pub const BOOT_ORDER_INTERFACE: &str = "xyz.openbmc_project.Control.Boot.BootOrder";

/// Prefix of the BIOS-config specific error names.
pub const BIOS_ERROR_NAMESPACE: &str = "xyz.openbmc_project.BIOSConfig.Common.Error";

/// Prefix of the generic error names.
pub const COMMON_ERROR_NAMESPACE: &str = "xyz.openbmc_project.Common.Error";

/// Persisted attribute table and pending attributes.
pub const BIOS_PERSIST_FILE: &str = "biosData";

/// Persisted current and pending boot order.
pub const BOOT_ORDER_PERSIST_FILE: &str = "bootOrderData";

/// Persisted secure boot state.
pub const SECURE_BOOT_PERSIST_FILE: &str = "securebootData";

/// Password hash and seed file, provisioned by the host firmware.
pub const SEED_FILE: &str = "seedData";
