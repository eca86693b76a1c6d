use crate::table::DiskLayout;

/// Where a rendered report belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

pub fn stream(layout: &DiskLayout) -> Stream {
    match layout {
        DiskLayout::Invalid(_) => Stream::Err,
        _ => Stream::Out,
    }
}

pub fn render(layout: &DiskLayout) -> Vec<String> {
    match layout {
        DiskLayout::Mbr { entries } if entries.is_empty() => {
            vec!["No partitions found".to_string()]
        }
        DiskLayout::Mbr { entries } => entries
            .iter()
            .map(|p| {
                format!(
                    "Partition {}: Size={}MB, Bootable: {}",
                    p.index,
                    p.size_mb(),
                    if p.bootable { "Yes" } else { "No" }
                )
            })
            .collect(),
        DiskLayout::GptProtected {
            partition_count,
            header_valid: true,
        } => vec![format!("GPT partitions: {}", partition_count)],
        DiskLayout::GptProtected {
            header_valid: false,
            ..
        } => vec!["GPT partitions: unknown".to_string()],
        DiskLayout::Invalid(reason) => vec![reason.to_string()],
    }
}
