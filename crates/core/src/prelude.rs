//! Tessera Prelude

pub use crate::{
    cart::{Cart, CartSummary, LineItem},
    customers::Customer,
    discounts::{
        ActiveWindow, AmountOffOrder, BuyXGetY, BuysRequirement, Combinations,
        CustomerEligibility, Discount, DiscountFamily, DiscountKind, GetsValue, ItemScope,
        ItemTargets, Method, MinimumPurchase, OrderValue, Status, UsageLimits, WindowStatus,
    },
    evaluation::{
        Evaluation, EvaluationContext, Qualification, Rejection, UsageSnapshot, evaluate,
    },
    money::EngineError,
    pricing::compute_amount,
    ranking::{
        CodeRejection, CodeValidation, RankedDiscount, Ranking, check_eligible, normalize_code,
        validate_code,
    },
    uuids::{
        CollectionId, CustomerId, DiscountId, OrderId, ProductId, SegmentId, StoreId, TypedUuid,
        UsageId,
    },
};
