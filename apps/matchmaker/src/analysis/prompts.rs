// Prompt templates for resume analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::analysis::parser::SECTIONS;
use crate::llm_client::prompts::STRICT_FORMAT_INSTRUCTION;

/// Summary prompt. Replace `{resume}` and `{template}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Solicitação de resumo de currículo em Markdown.

Currículo do candidato:

{resume}

Gere um resumo em Markdown seguindo rigorosamente o modelo abaixo.
Não adicione seções extras, tabelas ou qualquer outra estrutura.
Use uma linha por item, com "- " no início, nas seções de lista.

```markdown
{template}
```
"#;

/// Opinion prompt. Replace `{resume}` and `{job}` before sending.
pub const OPINION_PROMPT_TEMPLATE: &str = r#"Analise criticamente o currículo abaixo com base na vaga.

Estruture a resposta com os seguintes tópicos, com títulos grandes:

1. **Pontos de Alinhamento**: o que está aderente à vaga?
2. **Pontos de Desalinhamento**: o que não atende aos requisitos?
3. **Pontos de Atenção**: lacunas, mudanças de carreira, etc.

Currículo:
{resume}

Vaga:
{job}

Gere a resposta como um relatório bem estruturado e profissional."#;

/// Score prompt. Replace `{resume}` and `{job}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Objetivo: avaliar o currículo com base na vaga e gerar uma pontuação final (máximo 10.0).

Critérios e pesos:
1. Experiência (30%)
2. Habilidades técnicas (25%)
3. Educação (10%)
4. Pontos fortes (15%)
5. Pontos fracos (10%)

Currículo:
{resume}

Descrição da vaga:
{job}

Saída esperada:
```
Pontuação Final: x.x
```
Obs: responda apenas com essa linha, trocando x.x pela nota com uma casa decimal."#;

/// Markdown skeleton with one `##` heading per known section.
pub fn summary_template() -> String {
    SECTIONS
        .iter()
        .map(|spec| format!("## {}\n{} aqui", spec.headings[0], spec.key.as_str()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn summary_prompt(resume: &str) -> String {
    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{template}", &summary_template())
        .replace("{resume}", resume);
    format!("{prompt}\n{STRICT_FORMAT_INSTRUCTION}")
}

pub fn opinion_prompt(resume: &str, job: &str) -> String {
    OPINION_PROMPT_TEMPLATE
        .replace("{resume}", resume)
        .replace("{job}", job)
}

pub fn score_prompt(resume: &str, job: &str) -> String {
    let prompt = SCORE_PROMPT_TEMPLATE
        .replace("{resume}", resume)
        .replace("{job}", job);
    format!("{prompt}\n{STRICT_FORMAT_INSTRUCTION}")
}
