//! Static reference data: the private document, sample questions, and the
//! per-step explanation table shown next to every pipeline stage.

use ragsim_shared::{Document, DocumentKind, Step};

/// The fictional private policy the augmented pipeline ingests.
///
/// No public model has seen it, which is what makes the baseline answers
/// visibly worse.
pub const DOCUMENT: Document = Document {
    id: "doc-uoe-2025",
    name: "University of Excellence - Academic & Campus Policy 2025",
    kind: DocumentKind::Policy,
    content: "UNIVERSITY OF EXCELLENCE
Academic & Campus Policy Handbook 2025

Section 1: Attendance
From January 2025 all lecture halls use the Smart-Scan biometric attendance system.
Students must scan in within 10 minutes of the scheduled start time.   A minimum attendance
of 80% is required to sit end-semester examinations. Medical leave must be uploaded to the
student portal within 5 working days.

Section 2: AI Innovation Grant
Final-year students may apply for the AI innovation grant of $500 per project team.
Applications open on 1 March 2025 and close on 15 April 2025. Teams of two to four students
are eligible. Funds may be spent on cloud compute credits, sensors, or datasets, but not on
personal laptops.

Section 3: Library
The central library is open 8 AM to 10 PM on weekdays and 9 AM to 5 PM on weekends.
During examination weeks the reading hall stays open 24 hours.   Students may borrow up to
six books for 21 days. Late returns are charged $1 per book per day.

Section 4: Laboratory Safety
Every student must complete the online lab safety module before their first practical
session. Closed footwear and lab coats are mandatory in all Civil, Mechanical and Electrical
engineering laboratories. Incidents must be reported to the lab supervisor within one hour.

Section 5: Academic Integrity
Use of generative AI tools in assignments must be declared on the cover sheet. Undeclared use
is treated as plagiarism and may lead to a zero grade for the assessment.
",
};

/// Ready-made questions answerable only from [`DOCUMENT`].
pub const SAMPLE_QUESTIONS: [&str; 5] = [
    "What is the grant amount for AI innovation projects?",
    "What attendance system is used from 2025?",
    "What are the library hours on weekends?",
    "What is the minimum attendance needed to sit exams?",
    "Do I have to declare use of generative AI in assignments?",
];

/// Presentation metadata for one pipeline step.
#[derive(Debug, Clone, Copy)]
pub struct StepInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub tools: &'static [&'static str],
}

/// Look up the explanation table entry for `step`.
pub fn step_info(step: Step) -> &'static StepInfo {
    match step {
        Step::Question => &StepInfo {
            title: "User Question",
            description: "Everything starts with a question. Pick a sample or type your own about the university policy.",
            tools: &["Chat UI", "Web form"],
        },
        Step::Ingest => &StepInfo {
            title: "Document Ingestion",
            description: "Private documents are loaded into the system. In a real deployment these come from PDFs, Word files, wikis or databases.",
            tools: &["PyPDF", "Unstructured", "Apache Tika"],
        },
        Step::Clean => &StepInfo {
            title: "Cleaning",
            description: "Raw text is normalized: extra whitespace, headers and formatting noise are removed so only meaningful text remains.",
            tools: &["Regex", "BeautifulSoup", "spaCy"],
        },
        Step::Chunk => &StepInfo {
            title: "Chunking",
            description: "The document is cut into smaller pieces. Small chunks are precise but lose context; large chunks keep context but add noise.",
            tools: &["LangChain TextSplitter", "LlamaIndex NodeParser"],
        },
        Step::Embed => &StepInfo {
            title: "Embedding",
            description: "Each chunk is turned into a vector of numbers that captures its meaning. Similar meanings land close together.",
            tools: &["OpenAI text-embedding-3", "Sentence-Transformers", "Gemini Embeddings"],
        },
        Step::Store => &StepInfo {
            title: "Vector Store",
            description: "Vectors are saved in a database built for fast similarity search, together with the original text and metadata.",
            tools: &["Pinecone", "Chroma", "pgvector", "Qdrant"],
        },
        Step::QueryEmbed => &StepInfo {
            title: "Query Embedding",
            description: "The question is converted into a vector using the same embedding model as the chunks.",
            tools: &["Same embedding model as ingestion"],
        },
        Step::Retrieval => &StepInfo {
            title: "Retrieval",
            description: "The database returns the Top-K chunks whose vectors are closest to the question vector.",
            tools: &["Cosine similarity", "HNSW index", "BM25 hybrid search"],
        },
        Step::Rerank => &StepInfo {
            title: "Reranking",
            description: "A second, more careful model re-reads the retrieved chunks and reorders them by true relevance.",
            tools: &["Cohere Rerank", "Cross-encoders", "bge-reranker"],
        },
        Step::Prompt => &StepInfo {
            title: "Prompt Augmentation",
            description: "The retrieved chunks are pasted into the prompt as evidence, together with instructions to answer only from them.",
            tools: &["Prompt templates", "LangChain", "LlamaIndex"],
        },
        Step::Generate => &StepInfo {
            title: "LLM Generation",
            description: "The language model writes the answer. With RAG it is grounded in the evidence and can cite its sources.",
            tools: &["Gemini", "GPT-4o", "Claude", "Llama 3"],
        },
        Step::Compare => &StepInfo {
            title: "Compare Results",
            description: "Put the answers side by side: without retrieval the model guesses, with retrieval it quotes the policy.",
            tools: &["Human evaluation", "RAGAS", "TruLens"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_has_metadata() {
        for step in Step::ALL {
            let info = step_info(step);
            assert!(!info.title.is_empty(), "{step} has no title");
            assert!(!info.description.is_empty(), "{step} has no description");
            assert!(!info.tools.is_empty(), "{step} has no tools");
        }
    }

    #[test]
    fn document_mentions_sample_answers() {
        assert!(DOCUMENT.content.contains("$500"));
        assert!(DOCUMENT.content.contains("Smart-Scan"));
        assert_eq!(DOCUMENT.kind, DocumentKind::Policy);
    }
}
