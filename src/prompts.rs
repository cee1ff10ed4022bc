//! The fixed transcript-extraction prompt sent to the vision model.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the model's extraction, matching, and
//!    waiver-percentage behaviour is entirely prompt-driven; changing it
//!    requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can assert on prompt assembly without
//!    calling a real model.
//!
//! The prompt is in Portuguese because the documents it describes (Brazilian
//! higher-education transcripts) and the JSON contract it demands are
//! Portuguese. Do not translate it: the downstream consumers of the response
//! depend on the exact output schema it specifies.

use serde_json::Value;

/// Extraction + comparison instructions for the model.
///
/// Asks the model to (1) extract student data and completed courses from the
/// document, (2) structure everything as JSON, and (3) compare completed
/// courses against the new curriculum, computing a waiver percentage from
/// workload hours.
pub const EXTRACTION_PROMPT: &str = r#"Você é um sistema especializado em leitura, interpretação e estruturação de documentos acadêmicos brasileiros (histórico escolar de ensino superior). Você recebe um documento em PDF ou imagem (escaneado) e um JSON com novas disciplinas. Sua tarefa é:
1) extrair dados do histórico escolar;
2) estruturar tudo no JSON solicitado;
3) comparar disciplinas já cursadas com as novas disciplinas e indicar possível dispensa com porcentagem baseada em carga horária.

ENTRADAS
A) DOCUMENTO (PDF ou IMAGEM)
- Histórico escolar de uma instituição de ensino superior brasileira.
- Pode conter ruídos de digitalização/OCR, tabelas, carimbos, assinaturas, abreviações e variações de layout.

B) JSON DE NOVAS DISCIPLINAS
Você receberá um JSON contendo as novas disciplinas que o aluno irá cursar. Exemplo (pode variar):
{
"novas_disciplinas": [
    {"codigo": "ABC123", "nome": "Algoritmos", "carga_horaria": 60},
    {"codigo": "DEF456", "nome": "Banco de Dados", "carga_horaria": 80}
]
}

OBJETIVOS DE EXTRAÇÃO (DO HISTÓRICO)
Extraia e identifique com precisão:

1) DADOS DO ALUNO
- Nome do Aluno
- Número de Matrícula
- Curso
- Período de Ingresso (ex.: 2021.1, 1º semestre de 2020, 2020/2 etc.)

2) DISCIPLINAS CURSADAS
Para cada disciplina cursada no histórico, extraia:
- codigo (se existir no documento; se não, use "")
- nome
- carga_horaria (em horas; se não constar, use 0)
- creditos (se não constar, use 0)
- nota (como texto; ex.: "8,5", "7.0", "A", "MB", "AP", "—")
- situacao (padronize para um destes valores quando possível):
"APROVADO", "REPROVADO", "CURSANDO", "TRANCADO", "DISPENSADO", "EQUIVALENCIA", "INDEFINIDO"

REGRAS IMPORTANTES (EXTRAÇÃO)
- Seja tolerante a erros de OCR e variações (ex.: “Matricula”, “Matrícula”, “RA”, “Registro Acadêmico”).
- Não invente informações.
- Se um campo não for encontrado, use "" (string vazia) para texto e 0 para números.
- Se a situação não estiver explícita:
- Se houver indicação clara de aprovação (“AP”, “Aprovado”, “Apto”, “Dispensado”, “Deferido”), use "APROVADO" ou "DISPENSADO" conforme o termo.
- Se houver indicação clara de reprovação (“RP”, “Reprovado”, “Reprov.”), use "REPROVADO".
- Se estiver em andamento (“Cursando”, “Em curso”), use "CURSANDO".
- Caso não seja possível inferir, use "INDEFINIDO".
- Se créditos ou carga horária estiverem em formato não padrão, converta para inteiro quando possível.
- Se houver nota na disciplina, então deve haver situação correspondente.
- Considere variações comuns de termos e abreviações.

COMPARAÇÃO COM AS NOVAS DISCIPLINAS (DISPENSA / APROVEITAMENTO)
Você deve comparar as disciplinas do histórico (disciplinas_cursadas) com as novas disciplinas recebidas no JSON.

COMO ENCONTRAR EQUIVALÊNCIA
Considere como “equivalente” quando:
- O código for igual (match exato), OU
- O nome for semelhante (variações de acento, abreviações, ordem de palavras)

REGRA DE PORCENTAGEM POR CARGA HORÁRIA
Quando você encontrar uma disciplina cursada equivalente a uma nova disciplina, calcule:

porcentagem_aproveitamento = (carga_horaria_cursada / carga_horaria_nova) * 100

- Arredonde a porcentagem para inteiro ou para 1 casa decimal (escolha uma e mantenha consistente).
- Se carga_horaria_nova for 0, defina porcentagem_aproveitamento como 0 e explique na observacao.

POSSÍVEL DISPENSA
- Defina possivel_dispensa = true quando:
- a disciplina cursada equivalente tiver situacao "APROVADO" ou "DISPENSADO" ou suas variantes como já foi decretado acima, E
- Caso contrário, possivel_dispensa = false, e descreva o motivo na observacao (ex.: “situação reprovado”, “não encontrada equivalente” etc.)

SAÍDA (OBRIGATÓRIA)
Retorne EXCLUSIVAMENTE um JSON válido, sem texto fora do JSON, seguindo exatamente esta estrutura:

{
"aluno": {
    "nome": "",
    "matricula": "",
    "curso": "",
    "periodo_ingresso": ""
},
"comparacao_disciplinas": [
    {
    "nova_disciplina": {
        "codigo": "",
        "nome": "",
        "carga_horaria": 0
    },
    "disciplina_cursada_equivalente": {
        "codigo": "",
        "nome": "",
        "carga_horaria": 0,
        "creditos": 0,
        "nota": "",
        "situacao": ""
    },
    "porcentagem_aproveitamento": 0,
    "possivel_dispensa": true,
    "observacao": ""
    }
]
}

ORIENTAÇÕES FINAIS
- Não inclua comentários, markdown, explicações ou qualquer texto fora do JSON.
- Preencha comparacao_disciplinas com um item para CADA nova disciplina:
- Se não encontrar equivalente no histórico, deixe disciplina_cursada_equivalente com campos vazios/0 e possivel_dispensa=false, explicando na observacao.
- Priorize matches por código. Se não houver, use similaridade de nome e evidências textuais."#;

/// Marker that separates the instructional template from the curriculum JSON.
pub const CURRICULUM_MARKER: &str = "\n\nJSON DE DISCIPLINAS:\n";

/// Assemble the full prompt: fixed template, marker, then the curriculum as
/// pretty-printed JSON.
///
/// serde_json never escapes non-ASCII characters, so accented course names
/// reach the model exactly as the caller sent them. Serialisation of a
/// `Value` cannot fail, so the fallback is unreachable in practice.
pub fn build_prompt(grade: &Value) -> String {
    let grade_json =
        serde_json::to_string_pretty(grade).unwrap_or_else(|_| grade.to_string());
    format!("{EXTRACTION_PROMPT}{CURRICULUM_MARKER}{grade_json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_contains_marker_and_curriculum() {
        let grade = json!([{"codigo": "X1", "nome": "Calc", "carga_horaria": 60}]);
        let prompt = build_prompt(&grade);
        assert!(prompt.starts_with(EXTRACTION_PROMPT));
        assert!(prompt.contains(CURRICULUM_MARKER));
        assert!(prompt.contains("\"codigo\": \"X1\""));
    }

    #[test]
    fn non_ascii_is_preserved_unescaped() {
        let grade = json!([{"nome": "Computação Gráfica"}]);
        let prompt = build_prompt(&grade);
        assert!(prompt.contains("Computação Gráfica"));
        assert!(!prompt.contains("\\u"));
    }

    #[test]
    fn curriculum_is_pretty_printed() {
        let grade = json!([{"codigo": "A"}, {"codigo": "B"}]);
        let prompt = build_prompt(&grade);
        // Pretty output spans multiple lines after the marker.
        let after_marker = prompt.split(CURRICULUM_MARKER).nth(1).unwrap();
        assert!(after_marker.lines().count() > 1);
    }

    #[test]
    fn prompt_demands_json_only_output() {
        assert!(EXTRACTION_PROMPT.contains("EXCLUSIVAMENTE um JSON válido"));
        assert!(EXTRACTION_PROMPT.contains("comparacao_disciplinas"));
    }
}
