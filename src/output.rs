use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::{
    error::CompileError,
    hierarchy::{Community, Hierarchy, Street},
};

struct AddressEntry<'a> {
    slug: &'a str,
    id: Cow<'a, str>,
}

impl Serialize for AddressEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.slug, &self.id)?;
        map.end()
    }
}

struct StreetEntry<'a> {
    slug: &'a str,
    id: Cow<'a, str>,
    addresses: Vec<AddressEntry<'a>>,
}

impl Serialize for StreetEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.slug, &self.id)?;
        map.serialize_entry("addresses", &self.addresses)?;
        map.end()
    }
}

impl<'a> StreetEntry<'a> {
    /// Entry with the ids assigned during the scan, children in first-seen order.
    fn scanned(street: &'a Street) -> Self {
        StreetEntry {
            slug: &street.slug,
            id: Cow::Borrowed(&street.id),
            addresses: street
                .addresses()
                .iter()
                .map(|address| AddressEntry {
                    slug: &address.slug,
                    id: Cow::Borrowed(&address.id),
                })
                .collect(),
        }
    }
}

struct CommunityEntry<'a> {
    community: &'a Community,
}

impl Serialize for CommunityEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let community = self.community;
        let streets: Vec<StreetEntry<'_>> =
            community.streets().iter().map(StreetEntry::scanned).collect();

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(&community.slug, &community.id)?;
        if !streets.is_empty() {
            map.serialize_entry("streets", &streets)?;
        }
        map.end()
    }
}

/// The whole hierarchy as one document, in first-seen order.
pub struct CombinedDocument<'a> {
    hierarchy: &'a Hierarchy,
}

impl<'a> CombinedDocument<'a> {
    pub fn new(hierarchy: &'a Hierarchy) -> Self {
        CombinedDocument { hierarchy }
    }
}

impl Serialize for CombinedDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Communities<'a>(&'a [Community]);

        impl Serialize for Communities<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
                for community in self.0 {
                    seq.serialize_element(&CommunityEntry { community })?;
                }
                seq.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        // key spelling is what downstream consumers read
        map.serialize_entry("comunities", &Communities(self.hierarchy.communities()))?;
        map.end()
    }
}

/// One community on its own, streets and addresses sorted by slug and
/// renumbered by their sorted rank.
pub struct CommunityDocument<'a> {
    slug: &'a str,
    streets: Vec<StreetEntry<'a>>,
}

impl<'a> CommunityDocument<'a> {
    pub fn sorted(community: &'a Community) -> Self {
        let mut streets: Vec<&Street> = community.streets().iter().collect();
        streets.sort_by(|a, b| a.slug.cmp(&b.slug));

        let streets = streets
            .into_iter()
            .enumerate()
            .map(|(s_idx, street)| {
                let street_id = format!("{}_{}", community.id, s_idx + 1);

                let mut slugs: Vec<&str> = street
                    .addresses()
                    .iter()
                    .map(|address| address.slug.as_str())
                    .collect();
                slugs.sort_unstable();

                let addresses = slugs
                    .into_iter()
                    .enumerate()
                    .map(|(a_idx, slug)| AddressEntry {
                        slug,
                        id: Cow::Owned(format!("{street_id}_{}", a_idx + 1)),
                    })
                    .collect();

                StreetEntry {
                    slug: &street.slug,
                    id: Cow::Owned(street_id),
                    addresses,
                }
            })
            .collect();

        CommunityDocument {
            slug: &community.slug,
            streets,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.slug)
    }
}

impl Serialize for CommunityDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.slug, &self.streets)?;
        map.end()
    }
}

/// Pretty JSON with a trailing newline.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CompileError> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write through a sibling temporary file so `path` is either absent, the old
/// content or the complete new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CompileError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = fs::write(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(CompileError::Io(path.to_path_buf(), e));
    }

    Ok(())
}

/// Write the combined document to `path`.
pub fn write_combined(hierarchy: &Hierarchy, path: &Path) -> Result<(), CompileError> {
    let bytes = to_json_bytes(&CombinedDocument::new(hierarchy))?;
    write_atomic(path, &bytes)
}

/// Write one `{slug}.json` per community with a configured number into
/// `outdir`, returning the paths written.
///
/// Every document is serialized before the first file is touched.
pub fn write_community_files(
    hierarchy: &Hierarchy,
    outdir: &Path,
) -> Result<Vec<PathBuf>, CompileError> {
    let documents = hierarchy
        .communities()
        .iter()
        .filter(|community| community.configured)
        .map(|community| {
            let document = CommunityDocument::sorted(community);
            Ok((outdir.join(document.file_name()), to_json_bytes(&document)?))
        })
        .collect::<Result<Vec<_>, CompileError>>()?;

    fs::create_dir_all(outdir).map_err(|e| CompileError::Io(outdir.to_path_buf(), e))?;

    let mut written = Vec::with_capacity(documents.len());
    for (path, bytes) in documents {
        write_atomic(&path, &bytes)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{
        CombinedDocument, CommunityDocument, to_json_bytes, write_combined, write_community_files,
    };
    use crate::hierarchy::Hierarchy;

    fn fixture() -> Hierarchy {
        let mut hierarchy = Hierarchy::new(Some("3_2_35_77"));

        let akron = hierarchy.community("akron", None);
        let summit = hierarchy.street(akron, "summit_st", false);
        hierarchy.address(summit, "862_n_summit_st", None);
        hierarchy.address(summit, "860_n_summit_st", None);
        let first = hierarchy.street(akron, "31st", true);
        hierarchy.address(first, "168", None);

        hierarchy.community("barberton", None);
        hierarchy
    }

    #[test]
    fn combined_document_keeps_scan_order() {
        let hierarchy = fixture();
        let value: Value = serde_json::to_value(CombinedDocument::new(&hierarchy)).unwrap();

        assert_eq!(
            value,
            json!({
                "comunities": [
                    {
                        "akron": "3_2_35_77_1",
                        "streets": [
                            {
                                "summit_st": "3_2_35_77_1_1",
                                "addresses": [
                                    {"862_n_summit_st": "3_2_35_77_1_1_1"},
                                    {"860_n_summit_st": "3_2_35_77_1_1_2"}
                                ]
                            },
                            {
                                "31st": "3_2_35_77_1_2",
                                "addresses": [{"168": "3_2_35_77_1_2_1"}]
                            }
                        ]
                    },
                    {"barberton": "3_2_35_77_2"}
                ]
            })
        );
    }

    #[test]
    fn combined_document_text_is_ordered_and_indented() {
        let mut hierarchy = Hierarchy::new(None);
        let akron = hierarchy.community("akron", Some(1));
        let street = hierarchy.street(akron, "31st", true);
        hierarchy.address(street, "168", None);

        let text = String::from_utf8(to_json_bytes(&CombinedDocument::new(&hierarchy)).unwrap())
            .unwrap();

        let expected = r#"{
  "comunities": [
    {
      "akron": "1",
      "streets": [
        {
          "31st": "1_1",
          "addresses": [
            {
              "168": "1_1_1"
            }
          ]
        }
      ]
    }
  ]
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn community_document_sorts_and_renumbers() {
        let hierarchy = fixture();
        let akron = hierarchy.get("akron").unwrap();
        let value: Value = serde_json::to_value(CommunityDocument::sorted(akron)).unwrap();

        assert_eq!(
            value,
            json!({
                "akron": [
                    {
                        "31st": "3_2_35_77_1_1",
                        "addresses": [{"168": "3_2_35_77_1_1_1"}]
                    },
                    {
                        "summit_st": "3_2_35_77_1_2",
                        "addresses": [
                            {"860_n_summit_st": "3_2_35_77_1_2_1"},
                            {"862_n_summit_st": "3_2_35_77_1_2_2"}
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn community_files_are_written_per_slug() {
        let dir = tempfile::tempdir().unwrap();
        let outdir = dir.path().join("out");

        let mut hierarchy = Hierarchy::new(None);
        let akron = hierarchy.community("akron", Some(1));
        let street = hierarchy.street(akron, "31st", true);
        hierarchy.address(street, "168", None);
        hierarchy.community("barberton", Some(2));

        let written = write_community_files(&hierarchy, &outdir).unwrap();

        assert_eq!(
            written,
            vec![outdir.join("akron.json"), outdir.join("barberton.json")]
        );
        let barberton: Value =
            serde_json::from_slice(&std::fs::read(outdir.join("barberton.json")).unwrap())
                .unwrap();
        assert_eq!(barberton, json!({"barberton": []}));
        assert!(!outdir.join("akron.json.tmp").exists());
    }

    #[test]
    fn community_files_skip_unconfigured_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let outdir = dir.path().join("out");

        let mut hierarchy = fixture();
        hierarchy.community("stow", Some(11));

        let written = write_community_files(&hierarchy, &outdir).unwrap();

        assert_eq!(written, vec![outdir.join("stow.json")]);
        assert!(!outdir.join("akron.json").exists());
    }

    #[test]
    fn combined_write_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");

        write_combined(&fixture(), &first).unwrap();
        write_combined(&fixture(), &second).unwrap();

        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
        assert!(!dir.path().join("first.json.tmp").exists());
    }
}
