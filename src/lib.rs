//! Adaptive banded pairwise alignment behind a model/bandwidth dispatch
//! layer.
//!
//! Four statically-specialized fill engines — {linear, affine} gap model ×
//! {16, 32}-cell bandwidth — sit behind one uniform surface. A context is
//! built once from ordinary parameters; its leading bytes are stamped with
//! the capability descriptors of the selected model, and every subsequent
//! fill/search/trace call resolves its implementation through those stamped
//! function pointers instead of a runtime conditional.
//!
//! ```
//! use banded_align::{init, dp_init, dp_fill_root, dp_trace, dp_clean, clean};
//! use banded_align::{AlignParams, Section, SeqLimit};
//! use banded_align::section::encode_seq;
//!
//! let a = encode_seq("GGAAAAAAAA");
//! let b = encode_seq("AAAAAAAA");
//! let lim = SeqLimit(0x8000_0000_0000);
//!
//! let mut ctx = init(Some(&AlignParams::simple(1, 1, 0, 1))).unwrap();
//! let mut dp = dp_init(&ctx, lim, lim).unwrap();
//!
//! let f = dp_fill_root(&mut dp, &Section::build(0, &a), 0, &Section::build(2, &b), 0).unwrap();
//! assert_eq!(f.max, 6);
//! let aln = dp_trace(&mut dp, Some(f), None, None).unwrap();
//! assert_eq!(aln.score, 6);
//!
//! dp_clean(&mut dp);
//! clean(&mut ctx);
//! ```

pub mod cigar;
pub mod defaults;
pub mod dispatch;
pub mod engine; // fill/trace engines, monomorphized per (model, bandwidth)
pub mod params;
pub mod section; // encoded sections and coordinate bookkeeping

pub use dispatch::facade::{
    clean, dp_clean, dp_dump_cigar_forward, dp_dump_cigar_reverse, dp_fill, dp_fill_root,
    dp_flush, dp_flush_stack, dp_init, dp_merge, dp_print_cigar_forward, dp_print_cigar_reverse,
    dp_recombine, dp_res_free, dp_save_stack, dp_search_max, dp_trace, init, select_model, Context,
};
pub use dispatch::{band_index, ApiTable, API_TABLE, DP_CTX_MAX};
pub use engine::context::DpContext;
pub use engine::types::{
    Alignment, Fill, LifeState, Segment, StackToken, TraceParams, STAT_TERM, STAT_UPDATE_A,
    STAT_UPDATE_B,
};
pub use params::{fill_scmat, AlignParams, GapModel, ScoringProfile};
pub use section::{PosPair, Section, SeqLimit};
