// ── Exact-name lookup ──
//
// Vendor search is fuzzy, so a name lookup is search -> load every
// candidate -> keep the one whose loaded name matches exactly.

use tracing::debug;

use pureresponse_api::bean::fields;
use pureresponse_api::codec::text_field;
use pureresponse_api::{
    BeanClass, BeanType, ErrorCode, FieldValue, Mapping, OperationResult, Process, Reply,
    Request, Session, Transport,
};

/// Which bean class to search and which fields hold its name and id.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target {
    pub class: BeanClass,
    pub name_field: &'static str,
    pub id_field: &'static str,
}

pub(crate) const CONTACT_LIST: Target = Target {
    class: BeanClass::CampaignList,
    name_field: fields::LIST_NAME,
    id_field: fields::LIST_ID,
};

pub(crate) const EMAIL_MESSAGE: Target = Target {
    class: BeanClass::CampaignEmail,
    name_field: fields::MESSAGE_NAME,
    id_field: fields::MESSAGE_ID,
};

/// A bean confirmed to carry exactly the requested name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FoundBean {
    /// Domain id (`listId` / `messageId`) from the search hit.
    pub id: String,
    /// Entity handle from the load, needed to store or remove it.
    pub bean_id: Option<String>,
}

/// Outcome of [`find_exact`] together with the reply that decided it: the
/// matching load, the last non-matching load, or the search itself when it
/// had no candidates.
#[derive(Debug)]
pub(crate) struct Lookup {
    pub found: Option<FoundBean>,
    pub reply: Reply,
}

/// Search `target` for `name` and confirm candidates by loading them.
///
/// An unsuccessful search or load is `Generic`, with that step's reply as
/// diagnostic.
pub(crate) async fn find_exact<T: Transport>(
    session: &Session<T>,
    target: Target,
    name: &str,
) -> OperationResult<Lookup> {
    let search = session
        .dispatch(
            Request::facade(target.class, Process::Search).with_entity(Mapping::from([(
                target.name_field.to_owned(),
                FieldValue::from(name),
            )])),
        )
        .await?;
    if !search.is_success() {
        return Err(search.failure(ErrorCode::Generic));
    }

    let candidates = candidate_ids(search.found_data(BeanType::Search, target.class), target);
    debug!(class = %target.class, name, candidates = candidates.len(), "search complete");

    let mut last = search;
    for id in candidates {
        let loaded = session
            .dispatch(
                Request::facade(target.class, Process::Load).with_entity(Mapping::from([(
                    target.id_field.to_owned(),
                    FieldValue::from(id.as_str()),
                )])),
            )
            .await?;
        if !loaded.is_success() {
            return Err(loaded.failure(ErrorCode::Generic));
        }

        let matches = loaded
            .bean(BeanType::Entity, target.class)
            .is_some_and(|bean| text_field(bean, target.name_field).as_deref() == Some(name));
        if matches {
            let bean_id = loaded.bean_id(BeanType::Entity, target.class);
            return Ok(Lookup {
                found: Some(FoundBean { id, bean_id }),
                reply: loaded,
            });
        }
        debug!(class = %target.class, %id, "candidate name differs");
        last = loaded;
    }

    Ok(Lookup {
        found: None,
        reply: last,
    })
}

/// Candidate ids from `idData`, in numeric index order.
fn candidate_ids(found: Option<&Mapping>, target: Target) -> Vec<String> {
    let Some(found) = found else {
        return Vec::new();
    };

    let mut hits: Vec<(usize, &String, &FieldValue)> = found
        .iter()
        .map(|(index, hit)| (index.parse().unwrap_or(usize::MAX), index, hit))
        .collect();
    hits.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    hits.into_iter()
        .filter_map(|(_, _, hit)| text_field(hit.as_map()?, target.id_field))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn candidates_are_ordered_numerically() {
        let found: Mapping = serde_json::from_value(json!({
            "10": { "listId": "ten" },
            "2": { "listId": "two" },
            "0": { "listId": "zero" },
            "1": { "other": "no id" }
        }))
        .unwrap();
        assert_eq!(
            candidate_ids(Some(&found), CONTACT_LIST),
            vec!["zero", "two", "ten"]
        );
    }

    #[test]
    fn no_found_data_means_no_candidates() {
        assert!(candidate_ids(None, EMAIL_MESSAGE).is_empty());
    }
}
