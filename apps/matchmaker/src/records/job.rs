//! Job posting normalization.

use serde_json::Value;
use tracing::warn;

use crate::models::Job;
use crate::records::raw::{RawJob, RawRecord, RecordKind};
use crate::records::values::has_information;
use crate::records::{NormalizedRecord, NO_INFORMATION};

/// Age range the source form emits when both bounds were left blank.
const EMPTY_AGE_RANGE: &str = "De: Até:";

/// Other-language value when the posting asks for none.
pub const NO_OTHER_LANGUAGE: &str = "nenhum";

pub fn normalize_jobs(document: &Value) -> Vec<Job> {
    let Some(entries) = document.as_object() else {
        warn!("Jobs document is not a JSON object; nothing to normalize");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(code, body)| match RawRecord::decode(RecordKind::Job, body.clone()) {
            Ok(RawRecord::Job(raw)) => normalize_job(code, &raw),
            Ok(_) => None,
            Err(e) => {
                warn!(job_code = %code, "Dropping undecodable job record: {e}");
                None
            }
        })
        .collect()
}

pub fn normalize_job(code: &str, raw: &RawJob) -> Option<Job> {
    let code = code.trim();
    if code.is_empty() {
        warn!("Dropping job record without code");
        return None;
    }

    let r = NormalizedRecord::from_groups(raw.groups());

    let age_range = r.text("faixa_etaria");
    let age_range = if age_range == EMPTY_AGE_RANGE {
        NO_INFORMATION.to_string()
    } else {
        age_range
    };

    let other_language = r.text("outro_idioma");
    let other_language = if has_information(&other_language) {
        other_language
    } else {
        NO_OTHER_LANGUAGE.to_string()
    };

    Some(Job {
        code: code.to_string(),
        title: r.text("titulo_vaga"),
        client: r.text("cliente"),
        requester: r.text("solicitante_cliente"),
        division: r.text("empresa_divisao"),
        analyst: r.text("analista_responsavel"),
        contract_type: r.text("tipo_contratacao"),
        hiring_deadline: r.text("prazo_contratacao"),
        objective: r.text("objetivo_vaga"),
        priority: r.text("prioridade_vaga"),
        origin: r.text("origem_vaga"),
        manager: r.text("superior_imediato"),
        contact_name: r.text("nome"),
        contact_phone: r.text("telefone"),
        requested_on: r.date("data_requisicao"),
        expected_hire_by: r.date("limite_esperado_para_contratacao"),
        start_date: r.date("data_inicial"),
        end_date: r.date("data_final"),
        country: r.text("pais"),
        state: r.text("estado"),
        city: r.text("cidade"),
        neighborhood: r.text("bairro"),
        region: r.text("regiao"),
        workplace: r.text("local_trabalho"),
        disability_specific: r.text("vaga_especifica_para_pcd"),
        age_range,
        work_hours: r.text("horario_trabalho"),
        professional_level: r.text("nivel_profissional"),
        academic_level: r.text("nivel_academico"),
        english_level: r.text("nivel_ingles"),
        spanish_level: r.text("nivel_espanhol"),
        other_language,
        areas: r.text("areas_atuacao"),
        description: r.text("principais_atividades"),
        requirements: r.text("competencia_tecnicas_e_comportamentais"),
        notes: r.text("demais_observacoes"),
        travel: r.text("viagens_requeridas"),
        equipment: r.text("equipamentos_necessarios"),
        sale_value: display_amount(r.money("valor_venda")),
        purchase_value: display_amount(r.money("valor_compra_1")),
        purchase_value_2: display_amount(r.money("valor_compra_2")),
    })
}

/// Monetary display string: two decimals, or the sentinel when unparseable.
fn display_amount(amount: Option<f64>) -> String {
    amount
        .map(|amount| format!("{amount:.2}"))
        .unwrap_or_else(|| NO_INFORMATION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::epoch_sentinel;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "4530": {
                "informacoes_basicas": {
                    "data_requicisao": "04-05-2021",
                    "limite_esperado_para_contratacao": "00-00-0000",
                    "titulo_vaga": "CONSULTOR CONTROL M",
                    "cliente": "Morris, Moran and Dodson",
                    "prioridade_vaga": "",
                    "superior_imediato": "-"
                },
                "perfil_vaga": {
                    "nivel profissional": "Pleno",
                    "faixa_etaria": "De: Até:",
                    "outro_idioma": "",
                    "principais_atividades": "- Operação\n- Monitoramento de jobs",
                    "competencia_tecnicas_e_comportamentais": "Control M"
                },
                "beneficios": {
                    "valor_venda": "R$ 1.500,00",
                    "valor_compra_1": "-",
                    "valor_compra_2": 980.5
                }
            },
            " ": {"informacoes_basicas": {"titulo_vaga": "sem código"}}
        })
    }

    #[test]
    fn test_jobs_without_code_are_dropped() {
        let jobs = normalize_jobs(&sample_document());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].code, "4530");
    }

    #[test]
    fn test_job_renames_dates_and_sentinels() {
        let job = &normalize_jobs(&sample_document())[0];
        assert_eq!(job.requested_on, NaiveDate::from_ymd_opt(2021, 5, 4).unwrap());
        assert_eq!(job.expected_hire_by, epoch_sentinel());
        assert_eq!(job.start_date, epoch_sentinel());
        assert_eq!(job.professional_level, "Pleno");
        assert_eq!(job.priority, NO_INFORMATION);
        assert_eq!(job.manager, NO_INFORMATION);
        assert_eq!(job.age_range, NO_INFORMATION);
        assert_eq!(job.other_language, NO_OTHER_LANGUAGE);
        assert_eq!(job.description, "- Operação - Monitoramento de jobs");
    }

    #[test]
    fn test_job_amounts_are_display_strings() {
        let job = &normalize_jobs(&sample_document())[0];
        assert_eq!(job.sale_value, "1500.00");
        assert_eq!(job.purchase_value, NO_INFORMATION);
        assert_eq!(job.purchase_value_2, "980.50");
    }

    #[test]
    fn test_analysis_brief_falls_back_to_title() {
        let mut job = normalize_job("1", &RawJob::default()).unwrap();
        job.title = "Desenvolvedor Rust".to_string();
        assert_eq!(job.analysis_brief(), "Desenvolvedor Rust");

        job.description = "Construir serviços".to_string();
        job.requirements = "Rust, Tokio".to_string();
        assert_eq!(job.analysis_brief(), "Construir serviços\n\nRust, Tokio");
    }
}
