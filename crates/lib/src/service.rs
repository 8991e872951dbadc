//! Request dispatch across the hosted BIOS configuration objects.
//!
//! [`BiosConfigService`] owns one instance of every object and routes each
//! [`Request`] to the object that handles it. Dispatch takes `&mut self`, so at
//! most one call is ever in flight.
//!
//! # Wire Shape
//!
//! Requests and responses are serde enums tagged by name:
//!
//! ```json
//! {"op": "SetAttribute", "name": "Turbo", "value": "Disabled"}
//! {"ok": {"type": "Done"}}
//! {"error": {"name": "xyz.openbmc_project.BIOSConfig.Common.Error.AttributeNotFound", "message": "..."}}
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attribute::{AttributeDetails, AttributeValue, BaseTable, PendingAttributes, ResetFlag};
use crate::boot_order::BootOrder;
use crate::config::ServiceConfig;
use crate::error::{BiosError, Result};
use crate::manager::Manager;
use crate::password::Password;
use crate::persist::PersistError;
use crate::secure_boot::{CurrentBootType, ModeType, SecureBoot, SecureBootState};

/// A call against one of the hosted objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
  SetAttribute { name: String, value: AttributeValue },
  GetAttribute { name: String },
  GetBaseBiosTable,
  SetBaseBiosTable { table: BaseTable },
  GetPendingAttributes,
  SetPendingAttributes { attributes: PendingAttributes },
  GetResetBiosSettings,
  SetResetBiosSettings { flag: ResetFlag },
  GetBootOrder,
  SetBootOrder { order: Vec<String> },
  GetPendingBootOrder,
  SetPendingBootOrder { order: Vec<String> },
  GetSecureBoot,
  SetCurrentBoot { value: CurrentBootType },
  SetPendingEnable { value: bool },
  SetMode { value: ModeType },
  ChangePassword {
    user_name: String,
    current_password: String,
    new_password: String,
  },
}

impl Request {
  /// Short operation name for logging. Never includes arguments.
  pub fn op(&self) -> &'static str {
    match self {
      Request::SetAttribute { .. } => "SetAttribute",
      Request::GetAttribute { .. } => "GetAttribute",
      Request::GetBaseBiosTable => "GetBaseBiosTable",
      Request::SetBaseBiosTable { .. } => "SetBaseBiosTable",
      Request::GetPendingAttributes => "GetPendingAttributes",
      Request::SetPendingAttributes { .. } => "SetPendingAttributes",
      Request::GetResetBiosSettings => "GetResetBiosSettings",
      Request::SetResetBiosSettings { .. } => "SetResetBiosSettings",
      Request::GetBootOrder => "GetBootOrder",
      Request::SetBootOrder { .. } => "SetBootOrder",
      Request::GetPendingBootOrder => "GetPendingBootOrder",
      Request::SetPendingBootOrder { .. } => "SetPendingBootOrder",
      Request::GetSecureBoot => "GetSecureBoot",
      Request::SetCurrentBoot { .. } => "SetCurrentBoot",
      Request::SetPendingEnable { .. } => "SetPendingEnable",
      Request::SetMode { .. } => "SetMode",
      Request::ChangePassword { .. } => "ChangePassword",
    }
  }
}

/// Successful outcome of a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Response {
  Done,
  Attribute(AttributeDetails),
  BaseBiosTable(BaseTable),
  PendingAttributes(PendingAttributes),
  ResetBiosSettings(ResetFlag),
  BootOrder(Vec<String>),
  SecureBoot(SecureBootState),
  CurrentBoot(CurrentBootType),
  PendingEnable(bool),
  Mode(ModeType),
}

/// Either a response or the bus error it failed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reply {
  Ok(Response),
  Error { name: String, message: String },
}

impl From<Result<Response>> for Reply {
  fn from(result: Result<Response>) -> Self {
    match result {
      Ok(response) => Reply::Ok(response),
      Err(e) => Reply::Error {
        name: e.bus_name(),
        message: e.to_string(),
      },
    }
  }
}

#[derive(Debug)]
pub struct BiosConfigService {
  manager: Manager,
  boot_order: BootOrder,
  password: Password,
  secure_boot: Option<SecureBoot>,
}

impl BiosConfigService {
  /// Open every object under `config.persist_dir`.
  pub fn open(config: &ServiceConfig) -> Result<Self, PersistError> {
    let secure_boot = if config.secure_boot {
      Some(SecureBoot::open(config)?)
    } else {
      debug!("secure boot object disabled");
      None
    };

    Ok(Self {
      manager: Manager::open(config)?,
      boot_order: BootOrder::open(config)?,
      password: Password::open(config)?,
      secure_boot,
    })
  }

  pub fn manager(&self) -> &Manager {
    &self.manager
  }

  pub fn boot_order(&self) -> &BootOrder {
    &self.boot_order
  }

  pub fn password(&self) -> &Password {
    &self.password
  }

  pub fn secure_boot(&self) -> Option<&SecureBoot> {
    self.secure_boot.as_ref()
  }

  fn secure_boot_mut(&mut self) -> Result<&mut SecureBoot> {
    self
      .secure_boot
      .as_mut()
      .ok_or_else(|| BiosError::internal("secure boot object is not hosted"))
  }

  /// Route `request` to the object that handles it.
  pub fn dispatch(&mut self, request: Request) -> Result<Response> {
    let op = request.op();
    debug!(op, "dispatch");

    let result = self.route(request);
    if let Err(e) = &result {
      warn!(op, error = %e, "request failed");
    }
    result
  }

  fn route(&mut self, request: Request) -> Result<Response> {
    let response = match request {
      Request::SetAttribute { name, value } => {
        self.manager.set_attribute(&name, value)?;
        Response::Done
      }
      Request::GetAttribute { name } => Response::Attribute(self.manager.get_attribute(&name)?),
      Request::GetBaseBiosTable => Response::BaseBiosTable(self.manager.base_bios_table().clone()),
      Request::SetBaseBiosTable { table } => Response::BaseBiosTable(self.manager.set_base_bios_table(table).clone()),
      Request::GetPendingAttributes => Response::PendingAttributes(self.manager.pending_attributes().clone()),
      Request::SetPendingAttributes { attributes } => {
        Response::PendingAttributes(self.manager.set_pending_attributes(attributes)?.clone())
      }
      Request::GetResetBiosSettings => Response::ResetBiosSettings(self.manager.reset_bios_settings()),
      Request::SetResetBiosSettings { flag } => Response::ResetBiosSettings(self.manager.set_reset_bios_settings(flag)),
      Request::GetBootOrder => Response::BootOrder(self.boot_order.boot_order().to_vec()),
      Request::SetBootOrder { order } => Response::BootOrder(self.boot_order.set_boot_order(order)?.to_vec()),
      Request::GetPendingBootOrder => Response::BootOrder(self.boot_order.pending_boot_order().to_vec()),
      Request::SetPendingBootOrder { order } => {
        Response::BootOrder(self.boot_order.set_pending_boot_order(order)?.to_vec())
      }
      Request::GetSecureBoot => Response::SecureBoot(self.secure_boot_mut()?.state()),
      Request::SetCurrentBoot { value } => Response::CurrentBoot(self.secure_boot_mut()?.set_current_boot(value)),
      Request::SetPendingEnable { value } => Response::PendingEnable(self.secure_boot_mut()?.set_pending_enable(value)),
      Request::SetMode { value } => Response::Mode(self.secure_boot_mut()?.set_mode(value)),
      Request::ChangePassword {
        user_name,
        current_password,
        new_password,
      } => {
        self
          .password
          .change_password(&user_name, &current_password, &new_password)?;
        Response::Done
      }
    };
    Ok(response)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::attribute::AttributeRecord;
  use tempfile::TempDir;

  fn service(temp: &TempDir) -> BiosConfigService {
    BiosConfigService::open(&ServiceConfig::new(temp.path())).unwrap()
  }

  #[test]
  fn request_wire_shape() {
    let request: Request =
      serde_json::from_str(r#"{"op": "SetAttribute", "name": "Frequency", "value": 2000}"#).unwrap();
    assert_eq!(
      request,
      Request::SetAttribute {
        name: "Frequency".into(),
        value: AttributeValue::Integer(2000),
      }
    );

    let request: Request = serde_json::from_str(r#"{"op": "SetMode", "value": "Deployed"}"#).unwrap();
    assert_eq!(request, Request::SetMode { value: ModeType::Deployed });

    let request: Request = serde_json::from_str(r#"{"op": "GetBootOrder"}"#).unwrap();
    assert_eq!(request.op(), "GetBootOrder");
  }

  #[test]
  fn reply_carries_bus_error_name() {
    let reply = Reply::from(Err(BiosError::AttributeNotFound("X".into())));
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(
      json["error"]["name"],
      "xyz.openbmc_project.BIOSConfig.Common.Error.AttributeNotFound"
    );

    let reply = Reply::from(Ok(Response::PendingEnable(true)));
    assert_eq!(
      serde_json::to_value(&reply).unwrap(),
      serde_json::json!({"ok": {"type": "PendingEnable", "value": true}})
    );
  }

  #[test]
  fn routes_to_manager() {
    let temp = TempDir::new().unwrap();
    let mut service = service(&temp);
    let table = BaseTable::from([("Frequency".to_string(), AttributeRecord::integer(1800, 800, 3200, 100))]);

    service.dispatch(Request::SetBaseBiosTable { table }).unwrap();
    service
      .dispatch(Request::SetAttribute {
        name: "Frequency".into(),
        value: AttributeValue::Integer(2000),
      })
      .unwrap();

    match service
      .dispatch(Request::GetAttribute {
        name: "Frequency".into(),
      })
      .unwrap()
    {
      Response::Attribute(details) => assert_eq!(details.pending_value, Some(AttributeValue::Integer(2000))),
      other => panic!("expected Attribute, got: {:?}", other),
    }
  }

  #[test]
  fn disabled_secure_boot_is_internal_failure() {
    let temp = TempDir::new().unwrap();
    let mut service = BiosConfigService::open(&ServiceConfig::new(temp.path()).with_secure_boot(false)).unwrap();

    assert!(service.secure_boot().is_none());
    assert!(matches!(
      service.dispatch(Request::GetSecureBoot),
      Err(BiosError::InternalFailure(_))
    ));
    assert!(!ServiceConfig::new(temp.path()).secure_boot_file().exists());
  }

  #[test]
  fn boot_order_rejection_surfaces() {
    let temp = TempDir::new().unwrap();
    let mut service = service(&temp);

    let err = service
      .dispatch(Request::SetPendingBootOrder {
        order: vec!["Boot01".into()],
      })
      .unwrap_err();
    assert!(matches!(err, BiosError::InvalidArgument(_)));
    assert_eq!(
      service.dispatch(Request::GetPendingBootOrder).unwrap(),
      Response::BootOrder(Vec::new())
    );
  }
}
