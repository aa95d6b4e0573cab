// Cross-cutting prompt fragments. Task prompts live next to the code that
// sends them (see analysis::prompts).

/// System prompt sent with every completion request.
pub const RECRUITER_SYSTEM: &str = "Você é um recrutador sênior de tecnologia. \
    Responda sempre em português, de forma objetiva e profissional. \
    Siga exatamente o formato de saída pedido, sem seções extras, \
    sem tabelas adicionais e sem comentários fora do formato.";

/// Instruction appended to prompts whose output is parsed by code.
pub const STRICT_FORMAT_INSTRUCTION: &str = "\
    IMPORTANTE: a resposta é lida por um programa. Não altere os títulos, \
    não traduza os títulos e não acrescente texto antes ou depois do formato pedido.";
