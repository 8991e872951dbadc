//! End-to-end tests for the BIOS configuration service.

use biosconf_lib::attribute::{
  AttributeRecord, AttributeType, AttributeValue, BaseTable, BoundOption, BoundType, PendingAttribute,
  PendingAttributes, ResetFlag,
};
use biosconf_lib::password::{ADMIN_ROLE, HashAlgorithm, pad_hash};
use biosconf_lib::persist::SchemaVersion;
use biosconf_lib::secure_boot::{CurrentBootType, ModeType, SecureBootState};
use biosconf_lib::{BiosConfigService, BiosError, Request, Response, ServiceConfig};
use tempfile::TempDir;

fn table() -> BaseTable {
  BaseTable::from([
    ("Frequency".to_string(), AttributeRecord::integer(1800, 800, 3200, 100)),
    (
      "BootMode".to_string(),
      AttributeRecord::enumeration("UEFI", &["UEFI", "Legacy"]),
    ),
    ("AssetTag".to_string(), AttributeRecord::string("", 0, 8)),
    (
      "Signed".to_string(),
      AttributeRecord::bare(AttributeType::Integer, AttributeValue::Integer(-5)).with_options(vec![
        BoundOption::new(BoundType::LowerBound, -10_i64),
        BoundOption::new(BoundType::UpperBound, 10_i64),
        BoundOption::new(BoundType::ScalarIncrement, 5_i64),
      ]),
    ),
  ])
}

fn open(temp: &TempDir) -> BiosConfigService {
  BiosConfigService::open(&ServiceConfig::new(temp.path())).unwrap()
}

fn pending(entries: &[(&str, AttributeType, AttributeValue)]) -> PendingAttributes {
  entries
    .iter()
    .map(|(name, ty, value)| (name.to_string(), PendingAttribute::new(*ty, value.clone())))
    .collect()
}

fn set_pending(service: &mut BiosConfigService, attributes: PendingAttributes) -> Result<Response, BiosError> {
  service.dispatch(Request::SetPendingAttributes { attributes })
}

#[test]
fn full_session_survives_restart() {
  let temp = TempDir::new().unwrap();
  {
    let mut service = open(&temp);
    service.dispatch(Request::SetBaseBiosTable { table: table() }).unwrap();
    set_pending(
      &mut service,
      pending(&[
        ("Frequency", AttributeType::Integer, AttributeValue::Integer(3200)),
        ("BootMode", AttributeType::Enumeration, "Legacy".into()),
      ]),
    )
    .unwrap();
    service
      .dispatch(Request::SetBootOrder {
        order: vec!["Boot0003".into(), "NETWORK".into()],
      })
      .unwrap();
    service
      .dispatch(Request::SetCurrentBoot {
        value: CurrentBootType::Enabled,
      })
      .unwrap();
  }

  let mut service = open(&temp);
  assert_eq!(service.manager().base_bios_table(), &table());
  assert_eq!(service.manager().pending_attributes().len(), 2);
  assert_eq!(service.boot_order().boot_order(), ["Boot0003", "NETWORK"]);
  assert_eq!(
    service.dispatch(Request::GetSecureBoot).unwrap(),
    Response::SecureBoot(SecureBootState {
      current_boot: CurrentBootType::Enabled,
      pending_enable: false,
      mode: ModeType::Unknown,
    })
  );
  // The reset flag is not persisted.
  assert_eq!(
    service.dispatch(Request::GetResetBiosSettings).unwrap(),
    Response::ResetBiosSettings(ResetFlag::NoAction)
  );
}

#[test]
fn negative_integer_range() {
  let temp = TempDir::new().unwrap();
  let mut service = open(&temp);
  service.dispatch(Request::SetBaseBiosTable { table: table() }).unwrap();

  for ok in [-10_i64, -5, 0, 5, 10] {
    service
      .dispatch(Request::SetAttribute {
        name: "Signed".into(),
        value: AttributeValue::Integer(ok),
      })
      .unwrap_or_else(|e| panic!("{ok} should be accepted: {e}"));
  }
  for bad in [-11_i64, -7, 3, 15] {
    let err = service
      .dispatch(Request::SetAttribute {
        name: "Signed".into(),
        value: AttributeValue::Integer(bad),
      })
      .unwrap_err();
    assert!(matches!(err, BiosError::InvalidArgument(_)), "{bad} should be rejected");
  }
}

#[test]
fn mixed_batch_is_atomic() {
  let temp = TempDir::new().unwrap();
  let mut service = open(&temp);
  service.dispatch(Request::SetBaseBiosTable { table: table() }).unwrap();

  let err = set_pending(
    &mut service,
    pending(&[
      ("AssetTag", AttributeType::String, "rack-7".into()),
      ("BootMode", AttributeType::Enumeration, "Network".into()),
    ]),
  )
  .unwrap_err();

  assert!(matches!(err, BiosError::InvalidArgument(_)));
  assert_eq!(
    service.dispatch(Request::GetPendingAttributes).unwrap(),
    Response::PendingAttributes(PendingAttributes::new())
  );
}

#[test]
fn claimed_type_must_match_table() {
  let temp = TempDir::new().unwrap();
  let mut service = open(&temp);
  service.dispatch(Request::SetBaseBiosTable { table: table() }).unwrap();

  let err = set_pending(
    &mut service,
    pending(&[("BootMode", AttributeType::String, "Legacy".into())]),
  )
  .unwrap_err();
  assert!(matches!(err, BiosError::InvalidArgument(_)));

  let err = set_pending(
    &mut service,
    pending(&[("Frequency", AttributeType::Integer, "1800".into())]),
  )
  .unwrap_err();
  assert!(matches!(err, BiosError::InvalidArgument(_)));
}

#[test]
fn string_length_bounds() {
  let temp = TempDir::new().unwrap();
  let mut service = open(&temp);
  service.dispatch(Request::SetBaseBiosTable { table: table() }).unwrap();

  set_pending(&mut service, pending(&[("AssetTag", AttributeType::String, "".into())])).unwrap();
  set_pending(&mut service, pending(&[("AssetTag", AttributeType::String, "12345678".into())])).unwrap();
  assert!(
    set_pending(&mut service, pending(&[("AssetTag", AttributeType::String, "123456789".into())])).is_err()
  );
}

#[test]
fn legacy_data_file_upgrades_and_can_be_rewritten_as_legacy() {
  let temp = TempDir::new().unwrap();
  let legacy_config = ServiceConfig::new(temp.path()).with_table_format(SchemaVersion::Legacy);
  {
    let mut service = BiosConfigService::open(&legacy_config).unwrap();
    service.dispatch(Request::SetBaseBiosTable { table: table() }).unwrap();
  }

  let raw: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(legacy_config.bios_file()).unwrap()).unwrap();
  assert_eq!(raw["version"], 0);

  let service = open(&temp);
  assert_eq!(service.manager().base_bios_table(), &table());
}

#[test]
fn password_change_through_dispatch() {
  let temp = TempDir::new().unwrap();
  let seed = [42u8; 32];
  let algorithm = HashAlgorithm::Sha384;
  let document = serde_json::json!({
    "UserPwdHash": pad_hash(&algorithm.derive("u", &seed).unwrap()),
    "AdminPwdHash": pad_hash(&algorithm.derive("a", &seed).unwrap()),
    "Seed": seed.to_vec(),
    "HashAlgo": "SHA384",
  });
  let config = ServiceConfig::new(temp.path());
  std::fs::write(config.seed_file(), document.to_string()).unwrap();

  let mut service = open(&temp);
  let change = |user: &str, current: &str| Request::ChangePassword {
    user_name: user.into(),
    current_password: current.into(),
    new_password: "b".into(),
  };

  assert_eq!(
    service.dispatch(change(ADMIN_ROLE, "u")),
    Err(BiosError::InvalidCurrentPassword)
  );
  assert_eq!(service.dispatch(change(ADMIN_ROLE, "a")).unwrap(), Response::Done);

  // The admin hash now belongs to the new password.
  assert_eq!(service.dispatch(change(ADMIN_ROLE, "b")).unwrap(), Response::Done);
  assert_eq!(
    service.dispatch(change(ADMIN_ROLE, "a")),
    Err(BiosError::InvalidCurrentPassword)
  );
}

#[test]
fn requests_parse_from_bus_spellings() {
  let request: Request = serde_json::from_str(
    r#"{"op": "SetResetBiosSettings", "flag": "xyz.openbmc_project.BIOSConfig.Manager.ResetFlag.FailSafeDefaults"}"#,
  )
  .unwrap();
  assert_eq!(
    request,
    Request::SetResetBiosSettings {
      flag: ResetFlag::FailSafeDefaults
    }
  );

  let request: Request = serde_json::from_str(
    r#"{"op": "SetPendingAttributes", "attributes": {"BootMode": ["xyz.openbmc_project.BIOSConfig.Manager.AttributeType.Enumeration", "Legacy"]}}"#,
  )
  .unwrap();
  match request {
    Request::SetPendingAttributes { attributes } => {
      assert_eq!(attributes["BootMode"].attribute_type, AttributeType::Enumeration)
    }
    other => panic!("expected SetPendingAttributes, got: {:?}", other),
  }
}
