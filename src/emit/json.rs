//! Backend writing the emission contract as a single JSON manifest.

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;

use super::{
    BASE_PACKAGE,
    Capability,
    DEFAULT_LOCALE_CONSTANT,
    DispatchArm,
    EmissionContract,
    EmitError,
    Emitter,
    LOCALE_ENUM_NAME,
    LocaleConstant,
    MessageKind,
};
use crate::ir::{
    MessageGroup,
    TranslationEntry,
};

pub const MANIFEST_FILE_NAME: &str = "messages.json";

/// Writes `messages.json` describing every generated type.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestEmitter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    meta_package: &'static str,
    locale_enum: LocaleEnum,
    default_locale: DefaultLocale,
    capability: Capability,
    packages: Vec<PackageRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocaleEnum {
    name: &'static str,
    constants: Vec<LocaleConstant>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultLocale {
    name: &'static str,
    value: LocaleConstant,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageRecord<'a> {
    path: &'a str,
    qualified_name: String,
    #[serde(flatten)]
    body: GroupRecord<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupRecord<'a> {
    messages: Vec<MessageRecord<'a>>,
    inner_groups: Vec<InnerGroupRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InnerGroupRecord<'a> {
    name: &'a str,
    type_name: String,
    #[serde(flatten)]
    body: GroupRecord<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageRecord<'a> {
    name: &'a str,
    qualified_type_name: String,
    #[serde(flatten)]
    kind: MessageKind,
    dispatch: Vec<ArmRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArmRecord<'a> {
    #[serde(flatten)]
    arm: DispatchArm<'a>,

    /// Human readable text, arguments shown as `{name}`.
    display: String,
}

impl Emitter for JsonManifestEmitter {
    fn emit(
        &self,
        contract: &EmissionContract<'_>,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, EmitError> {
        let manifest = build_manifest(contract);
        let json = serde_json::to_string_pretty(&manifest)?;

        let path = out_dir.join(MANIFEST_FILE_NAME);
        fs::write(&path, json).map_err(|source| EmitError::Io { path: path.clone(), source })?;

        tracing::debug!(path = %path.display(), packages = manifest.packages.len(), "Wrote manifest");
        Ok(vec![path])
    }
}

fn build_manifest<'a>(contract: &EmissionContract<'a>) -> Manifest<'a> {
    let packages = contract
        .output()
        .packages()
        .map(|(path, group)| {
            let qualified_name = contract.qualified_package(path);
            let body = group_record(contract, group, &qualified_name, false);
            PackageRecord { path, qualified_name, body }
        })
        .collect();

    Manifest {
        meta_package: BASE_PACKAGE,
        locale_enum: LocaleEnum { name: LOCALE_ENUM_NAME, constants: contract.locales() },
        default_locale: DefaultLocale {
            name: DEFAULT_LOCALE_CONSTANT,
            value: contract.default_locale(),
        },
        capability: Capability::MESSAGE,
        packages,
    }
}

fn group_record<'a>(
    contract: &EmissionContract<'a>,
    group: &'a MessageGroup,
    qualified_parent: &str,
    in_inner_group: bool,
) -> GroupRecord<'a> {
    let messages = group
        .messages
        .iter()
        .map(|(name, entry)| message_record(contract, name, entry, qualified_parent, in_inner_group))
        .collect();

    let inner_groups = group
        .inner_groups
        .iter()
        .map(|(name, inner)| {
            let type_name = EmissionContract::inner_group_type_name(name);
            let qualified = qualify(qualified_parent, &type_name);
            InnerGroupRecord {
                name,
                body: group_record(contract, inner, &qualified, true),
                type_name,
            }
        })
        .collect();

    GroupRecord { messages, inner_groups }
}

fn message_record<'a>(
    contract: &EmissionContract<'a>,
    name: &'a str,
    entry: &'a TranslationEntry,
    qualified_parent: &str,
    in_inner_group: bool,
) -> MessageRecord<'a> {
    let type_name = EmissionContract::message_type_name(name, in_inner_group);
    let dispatch = contract
        .dispatch_arms(entry)
        .into_iter()
        .map(|arm| ArmRecord { display: arm.text.to_string(), arm })
        .collect();

    MessageRecord {
        name,
        qualified_type_name: qualify(qualified_parent, &type_name),
        kind: EmissionContract::message_kind(entry),
        dispatch,
    }
}

fn qualify(parent: &str, name: &str) -> String {
    if parent.is_empty() { name.to_string() } else { format!("{parent}.{name}") }
}
