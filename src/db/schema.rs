//! SQL shipped to the remote `exec_sql` procedure.
//!
//! Every statement is safe to re-run: the drop is guarded by `IF EXISTS`
//! and the backfill only touches rows still holding a legacy value.

/// Drops and recreates `bookings_status_check` with the 11 booking statuses,
/// then rewrites legacy lowercase statuses to their new literals.
pub const STATUS_CONSTRAINT_FIX: &str = r#"
-- Drop the existing constraint
ALTER TABLE public.bookings DROP CONSTRAINT IF EXISTS bookings_status_check;

-- Add new constraint with all status values
ALTER TABLE public.bookings ADD CONSTRAINT bookings_status_check 
CHECK (status IN (
  'Pending',
  'Documentation Prepared',
  'Shipment Finalised',
  'Pickup Arranged',
  'Arrived Hub (Origin)',
  'Sorted to Destination',
  'In Transit to Destination',
  'Arrived Depot (Destination)',
  'Released from Customs',
  'Delivered',
  'Cancelled'
));

-- Update any existing records with old status values to new ones
UPDATE public.bookings 
SET status = CASE 
  WHEN status = 'pending' THEN 'Pending'
  WHEN status = 'confirmed' THEN 'Documentation Prepared'
  WHEN status = 'in_transit' THEN 'In Transit to Destination'
  WHEN status = 'delivered' THEN 'Delivered'
  WHEN status = 'cancelled' THEN 'Cancelled'
  ELSE status
END
WHERE status IN ('pending', 'confirmed', 'in_transit', 'delivered', 'cancelled');
"#;

/// Table the migration targets; also used by the connectivity probe.
pub const BOOKINGS_TABLE: &str = "bookings";

pub const STATUS_CONSTRAINT_NAME: &str = "bookings_status_check";
