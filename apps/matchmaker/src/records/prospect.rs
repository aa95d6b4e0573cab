//! Prospect (job applicant funnel) normalization.

use serde_json::Value;
use tracing::warn;

use crate::models::Prospect;
use crate::records::raw::{AttributeGroup, RawProspectGroup, RawRecord, RecordKind};
use crate::records::values::{clean_text, has_information};
use crate::records::NormalizedRecord;

pub fn normalize_prospects(document: &Value) -> Vec<Prospect> {
    let Some(entries) = document.as_object() else {
        warn!("Prospects document is not a JSON object; nothing to normalize");
        return Vec::new();
    };

    let mut prospects = Vec::new();
    for (job_code, body) in entries {
        match RawRecord::decode(RecordKind::ProspectGroup, body.clone()) {
            Ok(RawRecord::ProspectGroup(group)) => {
                prospects.extend(normalize_prospect_group(job_code, &group));
            }
            Ok(_) => {}
            Err(e) => warn!(job_code = %job_code, "Dropping undecodable prospect group: {e}"),
        }
    }
    prospects
}

/// Flattens one job's applicant list. The group's title is shared by every
/// prospect; its modality is not carried over.
pub fn normalize_prospect_group(job_code: &str, group: &RawProspectGroup) -> Vec<Prospect> {
    let job_code = job_code.trim();
    if job_code.is_empty() {
        warn!("Dropping prospect group without job code");
        return Vec::new();
    }

    let job_title = clean_text(group.titulo.as_ref().unwrap_or(&Value::Null));

    group
        .prospects
        .iter()
        .filter_map(|entry| normalize_prospect(job_code, &job_title, entry))
        .collect()
}

fn normalize_prospect(job_code: &str, job_title: &str, entry: &AttributeGroup) -> Option<Prospect> {
    let r = NormalizedRecord::from_groups([entry]);

    let candidate_code = r.text("codigo");
    if !has_information(&candidate_code) {
        warn!(job_code = %job_code, "Dropping prospect without candidate code");
        return None;
    }

    Some(Prospect {
        job_code: job_code.to_string(),
        job_title: job_title.to_string(),
        candidate_code,
        name: r.text("nome"),
        email: r.text("email"),
        phone: r.text("telefone"),
        status: r.text("situacao_candidato"),
        comment: r.text("comentario"),
        recruiter: r.text("recrutador"),
        applied_on: r.date("data_candidatura"),
        last_updated: r.date("ultima_atualizacao"),
    })
}
