use crate::entry::RegistryEntry;

fn part(
    id: &str,
    name: &str,
    entry_type: &str,
    subtype: Option<&str>,
    description: &str,
    sequence: &str,
) -> RegistryEntry {
    RegistryEntry {
        id: id.to_string(),
        name: name.to_string(),
        entry_type: entry_type.to_string(),
        subtype: subtype.map(String::from),
        short_description: description.to_string(),
        sequence: sequence.to_string(),
        linked_parts: None,
    }
}

fn assembly(id: &str, name: &str, description: &str, linked: &[&str]) -> RegistryEntry {
    RegistryEntry {
        id: id.to_string(),
        name: name.to_string(),
        entry_type: "PLASMID".to_string(),
        subtype: None,
        short_description: description.to_string(),
        sequence: String::new(),
        linked_parts: Some(linked.iter().map(|s| s.to_string()).collect()),
    }
}

/// Two small LCR assemblies sharing a backbone, plus their parts.
///
/// Used by `lcr seed` to populate a fresh registry for trying the planner out.
pub fn demo_entries() -> Vec<RegistryEntry> {
    vec![
        part(
            "SBC000001",
            "pSB1C3",
            "PLASMID",
            Some("BACKBONE"),
            "High copy backbone [CmR] - pMB1",
            "TACTAGTAGCGGCCGCTGCAGTCCGGCAAAAAAGGGCAAGGTGTCACCACCCTGCCCTTTTTCTTTAAAACCGAAAAGATTACTTCGCGTTATGCAGGCTTCCTCGCTCACTGACTCGCTGCGCTCGGTCGTTCGGCTGCGGCGAGCGGTATCAGCTCACTCAAAGGCGGTAATACGG",
        ),
        part(
            "SBC000010",
            "sfGFP",
            "PART",
            Some("ORF"),
            "Superfolder GFP [codon optimised E. coli]",
            "ATGAGCAAAGGAGAAGAACTTTTCACTGGAGTTGTCCCAATTCTTGTTGAATTAGATGGTGATGTTAATGGGCACAAATTTTCTGTCCGTGGAGAGGGTGAAGGTGATGCTACAAACGGAAAACTCACCCTTAAATTTATTTGCACTACTGGAAAACTACCTGTTCCGTGGCCAACACTTGTCACTACTCTGACCTATGGTGTTCAATGCTTTTCCCGTTATCCGGATCACATGAAACGGCATGACTTTTTCAAGAGTGCCATGCCCGAAGGTTATGTACAGGAACGCACTATATCTTTCAAAGATGACGGGACCTACAAGACGCGTGCTGAAGTCAAGTTTGAAGGTGATACCCTTGTTAATCGTATCGAGTTAAAGGGTATTGATTTTAAAGAAGATGGAAACATTCTTGGACACAAACTCGAGTACAACTTTAACTCACACAATGTATACATCACGGCAGACAAACAAAAGAATGGAATCAAAGCTAACTTCAAAATTCGCCACAACGTTGAAGATGGTTCCGTTCAACTAGCAGACCATTATCAACAAAATACTCCAATTGGCGATGGCCCTGTCCTTTTACCAGACAACCATTACCTGTCGACACAATCTGTCCTTTCGAAAGATCCCAACGAAAAGCGTGACCACATGGTCCTTCTTGAGTTTGTAACTGCTGCTGGGATTACACATGGCATGGATGAGCTCTACAAATAA",
        ),
        part(
            "SBC000011",
            "mRFP1",
            "PART",
            Some("ORF"),
            "Monomeric RFP - E0040 derivative",
            "ATGGCTTCCTCCGAAGACGTTATCAAAGAGTTCATGCGTTTCAAAGTTCGTATGGAAGGTTCCGTTAACGGTCACGAGTTCGAAATCGAAGGTGAAGGTGAAGGTCGTCCGTACGAAGGTACCCAGACCGCTAAACTGAAAGTTACCAAAGGTGGTCCGCTGCCGTTCGCTTGGGACATCCTGTCCCCGCAGTTCCAGTACGGTTCCAAAGCTTACGTTAAACACCCGGCTGACATCCCGGACTACCTGAAACTGTCCTTCCCGGAAGGTTTCAAATGGGAACGTGTTATGAACTTCGAAGACGGTGGTGTTGTTACCGTTACCCAGGACTCCTCCCTGCAAGACGGTGAGTTCATCTACAAAGTTAAACTGCGTGGTACCAACTTCCCGTCCGACGGTCCGGTTATGCAGAAAAAAACCATGGGTTGGGAAGCTTCCACCGAACGTATGTACCCGGAAGACGGTGCTCTGAAAGGTGAAATCAAAATGCGTCTGAAACTGAAAGACGGTGGTCACTACGACGCTGAAGTTAAAACCACCTACATGGCTAAAAAACCGGTTCAGCTGCCGGGTGCTTACAAAACCGACATCAAACTGGACATCACCTCCCACAACGAAGACTACACCATCGTTGAACAGTACGAACGTGCTGAAGGTCGTCACTCCACCGGTGCTTAA",
        ),
        part(
            "SBC000020",
            "dom_bb_gfp",
            "PART",
            Some("DOMINO"),
            "Bridging oligo [pSB1C3 to sfGFP]",
            "GCAGGCTTCCTCGCTCACTGACTCGCTGATGAGCAAAGGAGAAGAACTTTTCACTG",
        ),
        part(
            "SBC000021",
            "dom_gfp_bb",
            "PART",
            Some("DOMINO"),
            "Bridging oligo [sfGFP to pSB1C3]",
            "GGCATGGATGAGCTCTACAAATAATACTAGTAGCGGCCGCTGCAGTCCGGC",
        ),
        part(
            "SBC000022",
            "dom_gfp_rfp",
            "PART",
            Some("DOMINO"),
            "Bridging oligo [sfGFP to mRFP1]",
            "GGCATGGATGAGCTCTACAAATAAATGGCTTCCTCCGAAGACGTTATCAAAG",
        ),
        part(
            "SBC000023",
            "dom_rfp_bb",
            "PART",
            Some("DOMINO"),
            "Bridging oligo [mRFP1 to pSB1C3]",
            "CGTCACTCCACCGGTGCTTAATACTAGTAGCGGCCGCTGCAGTCCGGC",
        ),
        assembly(
            "SBC000101",
            "pLCR-sfGFP",
            "sfGFP expression - single insert",
            &["SBC000001", "SBC000020", "SBC000010", "SBC000021"],
        ),
        assembly(
            "SBC000102",
            "pLCR-sfGFP-mRFP1",
            "Dual reporter - two inserts",
            &[
                "SBC000001",
                "SBC000020",
                "SBC000010",
                "SBC000022",
                "SBC000011",
                "SBC000023",
            ],
        ),
    ]
}

/// Ids of the demo assemblies.
pub fn demo_assembly_ids() -> Vec<String> {
    demo_entries()
        .into_iter()
        .filter(|e| e.linked_parts.is_some())
        .map(|e| e.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_links_resolve() {
        let entries = demo_entries();
        let ids: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        for entry in &entries {
            for linked in entry.linked_parts.iter().flatten() {
                assert!(ids.contains(linked.as_str()), "dangling link {linked}");
            }
        }
    }

    #[test]
    fn test_demo_assembly_ids() {
        assert_eq!(demo_assembly_ids(), vec!["SBC000101", "SBC000102"]);
    }
}
